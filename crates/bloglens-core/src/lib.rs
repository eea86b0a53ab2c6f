//! Bloglens Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the bloglens system:
//! - Blog post models (submitted posts, stored rows, scored search hits)
//! - Embedding payloads (native vectors and their JSON-string encoding)
//! - Common error types
//! - Shared traits for the generative model and the post store
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, AppwriteConfig, ConfigError, GeminiConfig, LoggingConfig, SearchConfig,
    ServerConfig, SummaryConfig,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for bloglens operations
#[derive(Error, Debug)]
pub enum BloglensError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field '{0}' must be a string")]
    InvalidFieldType(&'static str),

    #[error("Content exceeds {0} characters")]
    ContentTooLarge(usize),

    #[error("{0}")]
    InvalidParameter(String),

    #[error("Invalid JSON in request body: {0}")]
    InvalidJson(String),

    #[error("Rate limited by model API")]
    RateLimited,

    #[error("Empty result from model API")]
    EmptyModelResult,

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BloglensError {
    /// True for errors caused by the request itself rather than upstream services.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_)
                | Self::InvalidFieldType(_)
                | Self::ContentTooLarge(_)
                | Self::InvalidParameter(_)
                | Self::InvalidJson(_)
        )
    }
}

impl From<ConfigError> for BloglensError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BloglensError>;

// ============================================================================
// Post Models
// ============================================================================

/// A blog post submitted for summary generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInput {
    /// Post title
    pub title: String,

    /// Post body, possibly containing HTML markup
    pub content: String,
}

impl PostInput {
    /// Create a new post input
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Embedding payload as stored on a post row
///
/// Rows written by different ingestion paths carry either a native float
/// array or its JSON-string encoding; both decode to the same vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EmbeddingData {
    /// Native float array
    Vector(Vec<f64>),

    /// JSON-encoded float array, stored as a string attribute
    Json(String),
}

impl EmbeddingData {
    /// Decode to a vector, parsing the JSON-string form when needed
    pub fn decode(&self) -> Result<Vec<f64>> {
        match self {
            Self::Vector(values) => Ok(values.clone()),
            Self::Json(raw) => serde_json::from_str(raw)
                .map_err(|e| BloglensError::StoreError(format!("Malformed embedding payload: {e}"))),
        }
    }
}

/// A blog post row as returned by the table store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRow {
    /// Row identifier assigned by the store
    #[serde(rename = "$id")]
    pub id: String,

    /// Row creation timestamp
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,

    /// Post title
    pub title: String,

    /// Post body, possibly containing HTML markup
    pub content: String,

    /// Precomputed embedding, if the row has been indexed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<EmbeddingData>,

    /// Remaining row attributes, preserved verbatim in responses
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PostRow {
    /// Create a new row with generated timestamps
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            title: title.into(),
            content: content.into(),
            embedding: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach an embedding payload
    pub fn with_embedding(mut self, embedding: EmbeddingData) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// One page of rows from the post table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    /// Total number of rows matching the listing
    pub total: u64,

    /// Fetched rows
    pub rows: Vec<PostRow>,
}

// ============================================================================
// Search Types
// ============================================================================

/// Raw search parameters as they arrive from the transport, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text
    pub query: String,

    /// Maximum rows to fetch from the store
    pub limit: Option<i64>,

    /// Rows to skip before fetching
    pub offset: Option<i64>,

    /// Minimum similarity score for a row to match
    pub threshold: Option<f64>,
}

impl SearchRequest {
    /// Create a new search request with no overrides
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: None,
            offset: None,
            threshold: None,
        }
    }

    /// Set the fetch limit
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the fetch offset
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the similarity threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// A post row paired with its similarity score for one query
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPost {
    /// The matched row, attributes preserved
    #[serde(flatten)]
    pub post: PostRow,

    /// Cosine similarity against the query embedding
    pub similarity: f64,
}

/// Search results for one query, ordered by descending similarity
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    /// Number of matching rows
    pub length: usize,

    /// Matching rows with scores
    pub rows: Vec<ScoredPost>,

    /// The query text that was searched
    pub query: String,

    /// Similarity threshold applied
    pub threshold: f64,

    /// Fetch limit applied
    pub limit: i64,

    /// Fetch offset applied
    pub offset: i64,
}

// ============================================================================
// Traits
// ============================================================================

/// Text generation side of the model API
#[async_trait::async_trait]
pub trait TextModel: Send + Sync {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Embedding side of the model API
#[async_trait::async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Generate an embedding vector for the text
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;

    /// Output dimensionality of the embedding model
    fn dimension(&self) -> usize;
}

/// Read access to the post table
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    /// Fetch up to `limit` post rows, skipping the first `offset`
    async fn list_posts(&self, limit: i64, offset: i64) -> Result<PostPage>;
}

// ============================================================================
// Tests
// ============================================================================
