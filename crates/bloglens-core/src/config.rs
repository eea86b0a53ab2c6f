//! Bloglens Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Gemini API configuration
    pub gemini: GeminiConfig,

    /// Appwrite TablesDB configuration
    pub appwrite: AppwriteConfig,

    /// Summary generation configuration
    pub summary: SummaryConfig,

    /// Semantic search configuration
    pub search: SearchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // Gemini
        if let Ok(key) = std::env::var("GOOGLE_GENAI_API_KEY") {
            config.gemini.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("GEMINI_BASE_URL") {
            config.gemini.base_url = url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Ok(model) = std::env::var("GEMINI_EMBEDDING_MODEL") {
            config.gemini.embedding_model = model;
        }
        if let Ok(dims) = std::env::var("GEMINI_EMBEDDING_DIMENSIONS") {
            config.gemini.embedding_dimensions =
                dims.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "GEMINI_EMBEDDING_DIMENSIONS".to_string(),
                    value: dims,
                })?;
        }

        // Appwrite
        if let Ok(endpoint) = std::env::var("APPWRITE_ENDPOINT") {
            config.appwrite.endpoint = endpoint;
        }
        if let Ok(project) = std::env::var("APPWRITE_PROJECT_ID") {
            config.appwrite.project_id = project;
        }
        if let Ok(key) = std::env::var("APPWRITE_API_KEY") {
            config.appwrite.api_key = key;
        }
        if let Ok(database) = std::env::var("APPWRITE_DATABASE_ID") {
            config.appwrite.database_id = database;
        }
        if let Ok(table) = std::env::var("APPWRITE_POSTS_TABLE_ID") {
            config.appwrite.posts_table_id = table;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty allows any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: String,

    /// Generation model name
    pub model: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Embedding output dimensionality
    pub embedding_dimensions: usize,

    /// Temperature for generation
    pub temperature: f64,

    /// Maximum tokens for a generated summary
    pub max_output_tokens: u32,

    /// Nucleus sampling parameter
    pub top_p: f64,

    /// Thinking token budget (0 disables thinking)
    pub thinking_budget: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-flash-lite-latest".to_string(),
            embedding_model: "gemini-embedding-001".to_string(),
            embedding_dimensions: 768,
            temperature: 1.0,
            max_output_tokens: 150,
            top_p: 0.95,
            thinking_budget: 0,
            timeout_secs: 60,
        }
    }
}

/// Appwrite TablesDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppwriteConfig {
    /// API endpoint
    pub endpoint: String,

    /// Project identifier
    pub project_id: String,

    /// API key with rows.read scope
    pub api_key: String,

    /// Database identifier
    pub database_id: String,

    /// Posts table identifier
    pub posts_table_id: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            api_key: String::new(),
            database_id: String::new(),
            posts_table_id: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Summary generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Maximum content length accepted from callers
    pub max_content_length_db: usize,

    /// Maximum content length sent to the model
    pub max_content_length: usize,

    /// Maximum words in a summary
    pub max_words: usize,

    /// Maximum retries after a rate limit response
    pub max_retries: u32,

    /// Base delay for retries in milliseconds
    pub retry_base_delay_ms: u64,

    /// Upper bound for random retry jitter in milliseconds
    pub retry_max_jitter_ms: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            max_content_length_db: 100_000,
            max_content_length: 3_000,
            max_words: 70,
            max_retries: 3,
            retry_base_delay_ms: 10_000,
            retry_max_jitter_ms: 1_000,
        }
    }
}

/// Semantic search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Rows fetched from the store when no limit is given
    pub default_limit: i64,

    /// Rows skipped when no offset is given
    pub default_offset: i64,

    /// Similarity threshold applied when none is given
    pub default_threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 1000,
            default_offset: 0,
            default_threshold: 0.5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
