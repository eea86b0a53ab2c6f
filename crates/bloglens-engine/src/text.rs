//! Text processing utilities for summary generation

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b.*?</script>").expect("valid regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b.*?</style>").expect("valid regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Strip HTML markup down to plain text
///
/// Script and style blocks are removed along with their contents; remaining
/// tags become spaces and whitespace runs collapse to single spaces.
pub fn strip_html_tags(content: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(content, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Truncate content to a maximum number of characters, appending an
/// ellipsis when a cut was made
pub fn truncate_content(content: &str, max_length: usize) -> String {
    if content.chars().count() <= max_length {
        return content.to_string();
    }
    let truncated: String = content.chars().take(max_length).collect();
    truncated + "..."
}

/// Extract the first `max_words` whitespace-separated words, appending an
/// ellipsis when the word budget was reached
pub fn extract_first_words(content: &str, max_words: usize) -> String {
    let words: Vec<&str> = content.split_whitespace().take(max_words).collect();
    let mut summary = words.join(" ");
    if words.len() >= max_words {
        summary.push_str("...");
    }
    summary
}
