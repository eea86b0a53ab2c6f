//! Semantic search handler

use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;
use crate::validate::parse_search_request;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use std::collections::HashMap;
use std::sync::Arc;

/// Handle semantic search requests
///
/// Unlike the summary path, every failure here is reported to the
/// caller, with the message copied into the envelope `error` field.
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(
        ("query" = String, Query, description = "Text to search for"),
        ("limit" = Option<i64>, Query, description = "Maximum rows to fetch"),
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
        ("threshold" = Option<f64>, Query, description = "Minimum similarity score, 0 to 1")
    ),
    responses(
        (status = 200, description = "Relevant posts ranked by similarity"),
        (status = 400, description = "Invalid search parameters"),
        (status = 500, description = "Embedding or store failure")
    )
)]
pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();

    tracing::info!("Processing semantic search request");

    let request = parse_search_request(&params).map_err(|e| ApiError::from(e).detailed())?;
    let results = state
        .search
        .search(&request)
        .await
        .map_err(|e| ApiError::from(e).detailed())?;

    tracing::info!("Search completed successfully");

    Ok(Envelope::ok("Relevant posts fetched successfully", results))
}
