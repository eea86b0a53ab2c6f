//! Summary generation with retry logic and fallback
//!
//! Rate limited model calls are retried with exponential backoff and
//! jitter; every other failure degrades to a deterministic fallback built
//! from the post content, so summary generation itself never fails.

use crate::text::{extract_first_words, strip_html_tags, truncate_content};
use bloglens_core::{BloglensError, PostInput, Result, SummaryConfig, TextModel};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Retry Policy
// ============================================================================

/// Backoff policy for rate limited model calls
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,

    /// Base delay, doubled on every retry cycle
    pub base_delay: Duration,

    /// Exclusive upper bound for random jitter added to each delay
    pub max_jitter: Duration,
}

impl RetryPolicy {
    /// Build from summary configuration
    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_jitter: Duration::from_millis(config.retry_max_jitter_ms),
        }
    }

    /// Decide what happens after a failed attempt
    pub fn next_step(&self, err: &BloglensError, remaining: u32, rng: &mut impl Rng) -> Step {
        match err {
            BloglensError::RateLimited if remaining > 0 => Step::Retry(self.delay(remaining, rng)),
            _ => Step::Fallback,
        }
    }

    /// Delay before the next attempt when `remaining` retries are left
    pub fn delay(&self, remaining: u32, rng: &mut impl Rng) -> Duration {
        let cycle = self.max_retries.saturating_sub(remaining);
        let exponential = self.base_delay.saturating_mul(2u32.saturating_pow(cycle));
        exponential + self.jitter(rng)
    }

    fn jitter(&self, rng: &mut impl Rng) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rng.gen_range(0..max_ms))
    }
}

/// Transition after a failed generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Sleep for the given delay, then try again
    Retry(Duration),

    /// Give up and use the fallback summary
    Fallback,
}

// ============================================================================
// Summarizer
// ============================================================================

/// Generates post summaries through the model with a fallback path
pub struct Summarizer {
    model: Arc<dyn TextModel>,
    config: SummaryConfig,
    policy: RetryPolicy,
}

impl Summarizer {
    /// Create a new summarizer
    pub fn new(model: Arc<dyn TextModel>, config: SummaryConfig) -> Self {
        let policy = RetryPolicy::from_config(&config);
        Self {
            model,
            config,
            policy,
        }
    }

    /// Generate a summary for the post
    ///
    /// Never fails: rate limits are retried with backoff and any terminal
    /// failure returns the first-words fallback instead.
    pub async fn summarize(&self, post: &PostInput) -> String {
        let content = self.shape_content(&post.content);
        let prompt = self.build_prompt(&post.title, &content);
        let mut remaining = self.policy.max_retries;

        loop {
            let result = self.model.generate(&prompt).await.and_then(|summary| {
                let summary = summary.trim().to_string();
                if summary.is_empty() {
                    Err(BloglensError::EmptyModelResult)
                } else {
                    Ok(summary)
                }
            });

            match result {
                Ok(summary) => {
                    tracing::debug!("Summary generated successfully");
                    return summary;
                }
                Err(err) => {
                    // Bind before matching so the non-Send ThreadRng temporary
                    // is dropped before the await in the retry arm.
                    let step = self
                        .policy
                        .next_step(&err, remaining, &mut rand::thread_rng());
                    match step {
                        Step::Retry(delay) => {
                            tracing::warn!(
                                "Rate limited. Retrying in {:.2}s... ({} retries left)",
                                delay.as_secs_f64(),
                                remaining
                            );
                            tokio::time::sleep(delay).await;
                            remaining -= 1;
                        }
                        Step::Fallback => {
                            tracing::error!("Summary generation failed: {err}");
                            tracing::info!("Using fallback summary generation");
                            return self.fallback_summary(post);
                        }
                    }
                }
            }
        }
    }

    /// First-words fallback used when generation fails
    pub fn fallback_summary(&self, post: &PostInput) -> String {
        let plain = strip_html_tags(&post.content);
        extract_first_words(&plain, self.config.max_words)
    }

    /// Strip markup and cut the content down to what the model should see
    fn shape_content(&self, content: &str) -> String {
        let plain = strip_html_tags(content);
        let mut shaped = truncate_content(&plain, self.config.max_content_length);

        // Secondary cap assuming roughly four characters per word
        if shaped.chars().count() / 4 > self.config.max_words {
            shaped = shaped.chars().take(self.config.max_words * 4).collect();
        }

        shaped
    }

    fn build_prompt(&self, title: &str, content: &str) -> String {
        format!(
            r#"Generate a concise and engaging summary for the following blog post titled "{title}".
Requirements:
  - Capture the main points and key takeaways
  - Make it compelling to entice readers
  - Length: {max_words} words
  - Write in an engaging, professional tone
  - the summary should be in plain text without any markdown or special formatting
Content:
  "{content}""#,
            max_words = self.config.max_words,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
