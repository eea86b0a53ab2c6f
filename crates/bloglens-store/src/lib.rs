//! Appwrite TablesDB client
//!
//! Fetches post rows over the TablesDB REST API. Queries are encoded as
//! JSON strings in repeated `queries[]` parameters, matching the wire
//! format the Appwrite server SDKs produce.

use async_trait::async_trait;
use bloglens_core::{AppwriteConfig, BloglensError, PostPage, PostStore, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

// ============================================================================
// Query Encoding
// ============================================================================

/// A single query predicate in the TablesDB wire format
#[derive(Debug, Clone, Serialize)]
pub struct ListQuery {
    method: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,

    values: Vec<Value>,
}

impl ListQuery {
    /// Cap the number of returned rows
    pub fn limit(limit: i64) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![json!(limit)],
        }
    }

    /// Skip rows before returning
    pub fn offset(offset: i64) -> Self {
        Self {
            method: "offset",
            attribute: None,
            values: vec![json!(offset)],
        }
    }

    /// Match rows where an attribute equals a value
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.into()),
            values: vec![value.into()],
        }
    }

    /// Serialize to the JSON string the API expects
    fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

// ============================================================================
// Client
// ============================================================================

/// TablesDB REST API client scoped to the posts table
pub struct TablesDbClient {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    table_id: String,
    timeout_secs: u64,
}

impl TablesDbClient {
    /// Create from config, checking that required credentials are present
    pub fn from_config(config: &AppwriteConfig) -> Result<Self> {
        let project_id = required(&config.project_id, "Appwrite project ID")?;
        let api_key = required(&config.api_key, "Appwrite API key")?;
        let database_id = required(&config.database_id, "Appwrite database ID")?;
        let table_id = required(&config.posts_table_id, "Appwrite posts table ID")?;

        Ok(Self {
            client: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id,
            api_key,
            database_id,
            table_id,
            timeout_secs: config.timeout_secs,
        })
    }

    /// List rows from the posts table with the given query predicates
    pub async fn list_rows(&self, queries: &[ListQuery]) -> Result<PostPage> {
        let url = format!(
            "{}/tablesdb/{}/tables/{}/rows",
            self.endpoint, self.database_id, self.table_id
        );
        let params: Vec<(&str, String)> =
            queries.iter().map(|q| ("queries[]", q.encode())).collect();

        tracing::debug!(table = %self.table_id, queries = queries.len(), "Listing rows");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| BloglensError::StoreError(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BloglensError::StoreError(format!(
                "Failed to fetch posts from database: {error_text}"
            )));
        }

        response
            .json::<PostPage>()
            .await
            .map_err(|e| BloglensError::StoreError(format!("Failed to parse row listing: {e}")))
    }
}

fn required(value: &str, name: &str) -> Result<String> {
    if value.is_empty() {
        return Err(BloglensError::ConfigError(format!("{name} required")));
    }
    Ok(value.to_string())
}

#[async_trait]
impl PostStore for TablesDbClient {
    async fn list_posts(&self, limit: i64, offset: i64) -> Result<PostPage> {
        tracing::debug!(limit, offset, "Fetching posts from database");

        let page = self
            .list_rows(&[ListQuery::limit(limit), ListQuery::offset(offset)])
            .await?;

        tracing::debug!(fetched = page.rows.len(), total = page.total, "Fetched posts");
        Ok(page)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bloglens_core::AppwriteConfig;

    fn test_config() -> AppwriteConfig {
        AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: "proj".to_string(),
            api_key: "key".to_string(),
            database_id: "db".to_string(),
            posts_table_id: "posts".to_string(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_limit_query_encoding() {
        assert_eq!(
            ListQuery::limit(25).encode(),
            r#"{"method":"limit","values":[25]}"#
        );
    }

    #[test]
    fn test_offset_query_encoding() {
        assert_eq!(
            ListQuery::offset(50).encode(),
            r#"{"method":"offset","values":[50]}"#
        );
    }

    #[test]
    fn test_equal_query_encoding() {
        assert_eq!(
            ListQuery::equal("published", true).encode(),
            r#"{"method":"equal","attribute":"published","values":[true]}"#
        );
    }

    #[test]
    fn test_from_config_requires_credentials() {
        assert!(TablesDbClient::from_config(&test_config()).is_ok());

        let missing_project = AppwriteConfig {
            project_id: String::new(),
            ..test_config()
        };
        assert!(matches!(
            TablesDbClient::from_config(&missing_project),
            Err(BloglensError::ConfigError(_))
        ));
    }

    #[test]
    fn test_endpoint_trailing_slash_is_stripped() {
        let config = AppwriteConfig {
            endpoint: "https://cloud.appwrite.io/v1/".to_string(),
            ..test_config()
        };
        let client = TablesDbClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint, "https://cloud.appwrite.io/v1");
    }

    #[test]
    fn test_row_listing_parses_store_payload() {
        let page: PostPage = serde_json::from_value(serde_json::json!({
            "total": 2,
            "rows": [
                {
                    "$id": "a",
                    "$createdAt": "2025-03-01T10:00:00.000+00:00",
                    "$updatedAt": "2025-03-01T10:00:00.000+00:00",
                    "title": "First",
                    "content": "one",
                    "embedding": [0.1, 0.2]
                },
                {
                    "$id": "b",
                    "$createdAt": "2025-03-01T11:00:00.000+00:00",
                    "$updatedAt": "2025-03-01T11:00:00.000+00:00",
                    "title": "Second",
                    "content": "two",
                    "embedding": "[0.3, 0.4]"
                }
            ]
        }))
        .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[1].embedding.as_ref().unwrap().decode().unwrap(), vec![0.3, 0.4]);
    }
}
