//! Gemini API client
//!
//! Talks to the Generative Language REST API for summary generation
//! and embeddings, implementing the core model traits.

use async_trait::async_trait;
use bloglens_core::{BloglensError, EmbeddingModel, GeminiConfig, Result, TextModel};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Client
// ============================================================================

/// Gemini REST API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            config,
        }
    }

    /// Create from config
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .ok_or_else(|| BloglensError::ConfigError("Gemini API key required".to_string()))?;

        Ok(Self::new(api_key.clone(), config.clone()))
    }

    /// Set custom base URL (for proxies or test servers)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
    top_p: f64,
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    /// Convenience field emitted by some API frontends
    #[serde(default)]
    text: Option<String>,

    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest {
    content: Content,
    output_dimensionality: usize,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: Option<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    #[serde(default)]
    values: Vec<f64>,
}

/// Pull the generated text out of a response, checking both known shapes
fn extract_text(response: &GenerateContentResponse) -> String {
    if let Some(text) = &response.text {
        if !text.is_empty() {
            return text.clone();
        }
    }

    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .map(|p| p.text.clone())
        .unwrap_or_default()
}

// ============================================================================
// Text Generation
// ============================================================================

#[async_trait]
impl TextModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                top_p: self.config.top_p,
                thinking_config: ThinkingConfig {
                    thinking_budget: self.config.thinking_budget,
                },
            },
        };

        tracing::debug!(model = %self.config.model, "Generating summary with Gemini API");

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.config.base_url, self.config.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout())
            .json(&request)
            .send()
            .await
            .map_err(|e| BloglensError::ModelError(format!("Request failed: {e}")))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(BloglensError::RateLimited);
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BloglensError::ModelError(format!(
                "Gemini error: {error_text}"
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| BloglensError::ModelError(format!("Failed to parse response: {e}")))?;

        let text = extract_text(&result);
        if text.trim().is_empty() {
            return Err(BloglensError::EmptyModelResult);
        }

        Ok(text.trim().to_string())
    }
}

// ============================================================================
// Embeddings
// ============================================================================

#[async_trait]
impl EmbeddingModel for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let request = EmbedContentRequest {
            content: Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
            output_dimensionality: self.config.embedding_dimensions,
        };

        tracing::debug!(model = %self.config.embedding_model, "Generating embeddings with Gemini API");

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:embedContent",
                self.config.base_url, self.config.embedding_model
            ))
            .header("x-goog-api-key", &self.api_key)
            .timeout(self.timeout())
            .json(&request)
            .send()
            .await
            .map_err(|e| BloglensError::ModelError(format!("Embedding request failed: {e}")))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(BloglensError::RateLimited);
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BloglensError::ModelError(format!(
                "Gemini embedding error: {error_text}"
            )));
        }

        let result: EmbedContentResponse = response.json().await.map_err(|e| {
            BloglensError::ModelError(format!("Failed to parse embedding response: {e}"))
        })?;

        let values = result.embedding.map(|e| e.values).unwrap_or_default();
        if values.is_empty() {
            return Err(BloglensError::EmptyModelResult);
        }

        tracing::debug!(dimensions = values.len(), "Generated embedding");
        Ok(values)
    }

    fn dimension(&self) -> usize {
        self.config.embedding_dimensions
    }
}

// ============================================================================
// Tests
// ============================================================================
