//! Bloglens API - REST server
//!
//! HTTP endpoints for post summary generation and semantic search.

pub mod body;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod validate;

pub use routes::create_router;
