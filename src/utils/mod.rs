//! Shared line-level helpers for the normalization passes.

pub mod blockquote;
pub mod code_heuristic;
pub mod fences;

use regex::Regex;
use std::sync::LazyLock;

/// Pattern: a list-item marker (`-`, `*`, or `1.`) followed by whitespace, on
/// an already-trimmed string.
pub static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([-*]|\d+\.)\s").unwrap());

/// Pattern: a line made exclusively of closing punctuation (`}`, `]`, `)`,
/// `;`), produced when the archive wraps the tail of a code statement.
pub static CLOSING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[}\]);]+$").unwrap());

/// Whether the trimmed string starts a list item.
pub fn is_list_item(trimmed: &str) -> bool {
    LIST_ITEM_RE.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item() {
        assert!(is_list_item("- item"));
        assert!(is_list_item("* item"));
        assert!(is_list_item("12. item"));
        assert!(is_list_item("1990. A fine year"));
        assert!(!is_list_item("-item"));
        assert!(!is_list_item("*emphasis*"));
    }

    #[test]
    fn test_closing_punct() {
        assert!(CLOSING_PUNCT_RE.is_match("}"));
        assert!(CLOSING_PUNCT_RE.is_match("});"));
        assert!(!CLOSING_PUNCT_RE.is_match("} else {"));
        assert!(!CLOSING_PUNCT_RE.is_match(""));
    }
}
