//! Application state shared across request handlers

use bloglens_core::AppConfig;
use bloglens_engine::{SemanticSearch, Summarizer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared application state
///
/// The pipelines carry their collaborators as trait objects, so tests
/// can build a state around scripted models and stores.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Summary generation pipeline
    pub summarizer: Summarizer,

    /// Semantic search pipeline
    pub search: SemanticSearch,

    /// Server start time
    start_time: Instant,

    /// Total requests served
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(config: AppConfig, summarizer: Summarizer, search: SemanticSearch) -> Self {
        Self {
            config,
            summarizer,
            search,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Count a served request
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Total requests served so far
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Seconds since the server started
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Whether the configuration carries the credentials both pipelines need
    pub fn is_ready(&self) -> bool {
        self.config.gemini.api_key.is_some()
            && !self.config.appwrite.project_id.is_empty()
            && !self.config.appwrite.api_key.is_empty()
    }
}
