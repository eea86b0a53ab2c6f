//! Summary generation handler

use crate::body::RequestBody;
use crate::error::ApiError;
use crate::response::Envelope;
use crate::state::AppState;
use crate::validate::validate_summary_body;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Summary request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct SummaryRequest {
    /// Post title
    #[schema(example = "Why Rust?")]
    pub title: String,

    /// Post content, HTML allowed
    #[schema(example = "<p>Rust is a systems programming language...</p>")]
    pub content: String,
}

/// Summary response payload
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryData {
    /// The generated or fallback summary
    #[schema(example = "An overview of what makes Rust attractive for systems work.")]
    pub summary: String,
}

/// Handle summary generation requests
///
/// The body goes through the multi-shape resolver rather than a typed
/// extractor so every transport shape gets the same validation messages.
/// Once validation passes this handler cannot fail: upstream problems
/// degrade to the fallback summary inside the pipeline.
#[utoipa::path(
    post,
    path = "/generate-post-summary",
    tag = "summary",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Summary generated", body = SummaryData),
        (status = 400, description = "Invalid request body")
    )
)]
pub async fn generate_post_summary(
    State(state): State<Arc<AppState>>,
    bytes: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();

    tracing::info!("Processing summary generation request");

    let body = RequestBody::from_http(&bytes).resolve()?;
    let post = validate_summary_body(&body, state.config.summary.max_content_length_db)?;

    let summary = state.summarizer.summarize(&post).await;

    tracing::info!("Summary generated and returned successfully");

    Ok(Envelope::ok(
        "Post summary generated successfully",
        SummaryData { summary },
    ))
}
