use std::sync::OnceLock;

use regex::Regex;

static WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// Canonical comparison form of free text: lowercase, punctuation turned into
/// spaces, whitespace runs collapsed, trimmed. Missing text is "".
pub fn normalize_text(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"));

    // Word characters are alphanumerics (any numeric category) and `_`.
    // Combining marks and joiners are not.
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();
    whitespace.replace_all(&spaced, " ").trim().to_string()
}
