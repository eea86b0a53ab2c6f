//! Standardized response envelope

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Response envelope returned by every endpoint
///
/// The HTTP status is mirrored in `statusCode` so clients that only read
/// the body see the same outcome as clients that read the status line.
/// Failure envelopes omit `data`; the `error` field is only set on paths
/// that report failure details to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T: Serialize> {
    /// Whether the request succeeded
    pub success: bool,

    /// HTTP status code, mirrored from the status line
    pub status_code: u16,

    /// Human-readable outcome message
    pub message: String,

    /// Response payload, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Failure details, present on paths that surface them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    /// Build a success envelope with payload
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            status_code: StatusCode::OK.as_u16(),
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
