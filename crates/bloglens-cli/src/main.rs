//! Bloglens CLI - Command-line interface
//!
//! Usage:
//!   bloglens summarize --title "My Post" --content-file post.html
//!   bloglens search "rust async" --limit 50 --threshold 0.6

use anyhow::Context;
use bloglens_core::config::AppConfig;
use bloglens_core::{EmbeddingModel, PostInput, PostStore, SearchRequest, TextModel};
use bloglens_engine::{SemanticSearch, Summarizer};
use bloglens_gemini::GeminiClient;
use bloglens_store::TablesDbClient;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "bloglens")]
#[command(about = "Blog post summarization and semantic search CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a summary for a blog post
    Summarize {
        /// Post title
        #[arg(long)]
        title: String,

        /// File holding the post content; reads stdin when omitted
        #[arg(long)]
        content_file: Option<String>,
    },
    /// Search posts by meaning
    Search {
        /// Query text
        query: String,

        /// Maximum rows to fetch
        #[arg(long)]
        limit: Option<i64>,

        /// Rows to skip
        #[arg(long)]
        offset: Option<i64>,

        /// Minimum similarity score, 0 to 1
        #[arg(long)]
        threshold: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Summarize {
            title,
            content_file,
        } => {
            let content = match content_file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading content from {path}"))?,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };

            let gemini = Arc::new(GeminiClient::from_config(&config.gemini)?);
            let summarizer = Summarizer::new(gemini as Arc<dyn TextModel>, config.summary.clone());

            let summary = summarizer.summarize(&PostInput::new(title, content)).await;
            println!("{summary}");
        }
        Commands::Search {
            query,
            limit,
            offset,
            threshold,
        } => {
            let gemini = Arc::new(GeminiClient::from_config(&config.gemini)?);
            let store = Arc::new(TablesDbClient::from_config(&config.appwrite)?);
            let search = SemanticSearch::new(
                gemini as Arc<dyn EmbeddingModel>,
                store as Arc<dyn PostStore>,
                config.search.clone(),
            );

            let mut request = SearchRequest::new(query);
            request.limit = limit;
            request.offset = offset;
            request.threshold = threshold;

            let results = search.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
