//! Request body resolution
//!
//! Summary requests arrive over more than one transport, and each
//! presents the body differently: some deliver pre-parsed JSON, some a
//! raw text payload, some a single ambiguous field that may hold either
//! a string or an object. The resolver tries each representation in a
//! fixed priority order and settles on one JSON object.

use bloglens_core::{BloglensError, Result};
use serde_json::{Map, Value};

/// The body representations a transport can supply
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    /// Pre-parsed JSON body, when the transport already decoded it
    pub json: Option<Value>,

    /// Raw text payload
    pub text: Option<String>,

    /// Ambiguous body field, either a string or an already-parsed object
    pub body: Option<Value>,
}

impl RequestBody {
    /// Wrap an already-parsed JSON body
    pub fn from_json(json: Value) -> Self {
        Self {
            json: Some(json),
            ..Self::default()
        }
    }

    /// Wrap a raw text payload
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Build from raw HTTP request bytes
    pub fn from_http(bytes: &[u8]) -> Self {
        Self::from_text(String::from_utf8_lossy(bytes))
    }

    /// Resolve the available representations to a single JSON object
    ///
    /// When no representation is usable this resolves to an empty object,
    /// which then fails downstream validation with a field-level message.
    pub fn resolve(&self) -> Result<Value> {
        // priority 1: pre-parsed JSON object
        if let Some(json) = &self.json {
            if json.is_object() {
                return Ok(json.clone());
            }
        }

        // priority 2: non-blank text payload
        if let Some(text) = &self.text {
            if !text.trim().is_empty() {
                return parse_json(text);
            }
        }

        // priority 3: the ambiguous field, parsed when a string
        if let Some(body) = &self.body {
            match body {
                Value::String(text) if !text.trim().is_empty() => return parse_json(text),
                Value::Object(_) => return Ok(body.clone()),
                _ => {}
            }
        }

        Ok(Value::Object(Map::new()))
    }
}

fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| BloglensError::InvalidJson(e.to_string()))
}
