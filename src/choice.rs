//! The choice extraction protocol.
//!
//! An executor stepping through a flow asks a model to wrap the branch label
//! it picked in a `<choice>...</choice>` marker. This module pulls that label
//! back out of the surrounding free-form text.

use regex::Regex;
use std::sync::LazyLock;

// Content may not contain `<`, so nested or malformed markers never match.
static CHOICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<choice>([^<]*)</choice>").unwrap());

/// Scans arbitrary text for choice markers and returns the trimmed content
/// of the last one, or `None` when the text carries no decision.
///
/// Later markers override earlier ones: a model that changes its mind
/// mid-response is taken at its final word.
///
/// # Example
///
/// ```rust
/// use keiro::extract_choice;
///
/// assert_eq!(
///     extract_choice("I'll go with <choice>yes</choice>"),
///     Some("yes".to_string())
/// );
/// assert_eq!(extract_choice("no marker here"), None);
/// ```
pub fn extract_choice(text: &str) -> Option<String> {
    CHOICE_RE
        .captures_iter(text)
        .last()
        .map(|caps| caps[1].trim().to_string())
}
