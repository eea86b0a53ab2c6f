//! Request validation

use bloglens_core::{BloglensError, PostInput, Result, SearchRequest};
use serde_json::Value;
use std::collections::HashMap;

/// Whether a JSON value counts as present
///
/// Null, false, zero, and the empty string are absent; everything else,
/// including non-string values, is present and left to the type check.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Validate a summary request body and extract the post fields
///
/// Checks run in order, stopping at the first failure: both fields
/// present, both strings, content within the store length limit.
pub fn validate_summary_body(body: &Value, max_content_length: usize) -> Result<PostInput> {
    let title = body.get("title");
    let content = body.get("content");

    if !title.is_some_and(is_truthy) {
        return Err(BloglensError::MissingField("title"));
    }
    if !content.is_some_and(is_truthy) {
        return Err(BloglensError::MissingField("content"));
    }

    let Some(title) = title.and_then(Value::as_str) else {
        return Err(BloglensError::InvalidFieldType("title"));
    };
    let Some(content) = content.and_then(Value::as_str) else {
        return Err(BloglensError::InvalidFieldType("content"));
    };

    if content.chars().count() > max_content_length {
        return Err(BloglensError::ContentTooLarge(max_content_length));
    }

    Ok(PostInput::new(title, content))
}

/// Parse search parameters from a query-string map
///
/// Blank parameters are treated as absent. Values that do not parse as
/// numbers fail with the same message as out-of-range values; range
/// checks themselves run in the search pipeline.
pub fn parse_search_request(params: &HashMap<String, String>) -> Result<SearchRequest> {
    let query = params.get("query").cloned().unwrap_or_default();
    let mut request = SearchRequest::new(query);

    if let Some(limit) = present(params, "limit") {
        request.limit = Some(limit.parse().map_err(|_| {
            BloglensError::InvalidParameter("Limit must be a positive number".to_string())
        })?);
    }
    if let Some(offset) = present(params, "offset") {
        request.offset = Some(offset.parse().map_err(|_| {
            BloglensError::InvalidParameter("Offset must be a non-negative number".to_string())
        })?);
    }
    if let Some(threshold) = present(params, "threshold") {
        request.threshold = Some(threshold.parse().map_err(|_| {
            BloglensError::InvalidParameter("Threshold must be between 0 and 1".to_string())
        })?);
    }

    Ok(request)
}

fn present<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}
