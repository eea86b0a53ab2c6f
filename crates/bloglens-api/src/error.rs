//! API error handling

use crate::response::Envelope;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bloglens_core::BloglensError;
use serde_json::Value;

/// API error rendered as a failure envelope
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status for the response
    pub status: StatusCode,
    /// Human-readable message
    pub message: String,
    /// Failure details, surfaced in the envelope `error` field when set
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Copy the message into the `error` field of the envelope
    pub fn detailed(self) -> Self {
        let message = self.message.clone();
        self.with_detail(message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Endpoint not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }
}

impl From<BloglensError> for ApiError {
    fn from(err: BloglensError) -> Self {
        let status = match &err {
            BloglensError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            e if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope: Envelope<Value> = Envelope {
            success: false,
            status_code: self.status.as_u16(),
            message: self.message,
            data: None,
            error: self.detail,
        };
        envelope.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let err = ApiError::from(BloglensError::MissingField("title"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing required field: title");
        assert!(err.detail.is_none());
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let err = ApiError::from(BloglensError::RateLimited);
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_upstream_errors_map_to_500() {
        let err = ApiError::from(BloglensError::StoreError("boom".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Store error: boom");
    }

    #[test]
    fn test_detailed_copies_message() {
        let err = ApiError::from(BloglensError::InvalidParameter(
            "Limit must be a positive number".to_string(),
        ))
        .detailed();
        assert_eq!(err.detail.as_deref(), Some("Limit must be a positive number"));
    }
}
