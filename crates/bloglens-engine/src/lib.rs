//! Bloglens Engine - summary and search pipelines
//!
//! This crate implements the two product pipelines on top of the core
//! traits:
//! - Summary generation: shape the post content, call the text model,
//!   retry rate limits with exponential backoff, and fall back to a
//!   first-words extract when generation cannot succeed
//! - Semantic search: embed the query, fetch post rows, rank them by
//!   cosine similarity, and filter by threshold
//!
//! Both pipelines take their collaborators as trait objects so tests can
//! substitute scripted implementations.

pub mod search;
pub mod similarity;
pub mod summarize;
pub mod text;

pub use search::{validate_search_request, SemanticSearch};
pub use similarity::cosine_similarity;
pub use summarize::{RetryPolicy, Step, Summarizer};
pub use text::{extract_first_words, strip_html_tags, truncate_content};
