//! Whitespace tokenization of already-encoded lines.

use regex::Regex;
use std::sync::OnceLock;

fn space_normalizer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex pattern"))
}

/// Collapse whitespace runs, trim, and split on spaces.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let normalized = space_normalizer().replace_all(line, " ");
    normalized
        .trim()
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
