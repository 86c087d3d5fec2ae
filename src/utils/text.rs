//! Text normalization for title matching

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Marker of error pages served with HTTP 200
pub const SOFT_404_MARKER: &str = "404 not found";

/// Collapse whitespace runs to one space, trim, lowercase.
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_lowercase()
}

/// Whether already-normalized text looks like a "404 Not Found" page
pub fn is_soft_404(normalized: &str) -> bool {
    normalized.contains(SOFT_404_MARKER)
}

/// Truncate long text for log display
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
