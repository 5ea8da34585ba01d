//! Blockquote-prefix helpers shared by the normalization passes.
//!
//! A blockquote prefix is the leading `>(\s?>)*` run of a line, optionally
//! followed by one space. Its depth is the number of `>` characters; two
//! prefixes are equivalent iff they have the same depth once spaces are
//! removed.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern: the blockquote prefix at column 0, including the single optional
/// space after the final marker. `(\s?>)*` keeps `>>` and `> >` equally valid.
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(>(?:\s?>)*\s?)").unwrap());

/// Split a line into its blockquote prefix and the remaining content.
///
/// The prefix includes the single space after the last `>` when present, so
/// `split_prefix("> > foo")` returns `("> > ", "foo")`. Lines without a
/// leading `>` return an empty prefix.
pub fn split_prefix(line: &str) -> (&str, &str) {
    match PREFIX_RE.find(line) {
        Some(m) => line.split_at(m.end()),
        None => ("", line),
    }
}

/// Whether the line carries a blockquote prefix at column 0.
pub fn has_prefix(line: &str) -> bool {
    line.starts_with('>')
}

/// Number of `>` markers in a prefix (or any string).
pub fn depth(prefix: &str) -> usize {
    prefix.chars().filter(|&c| c == '>').count()
}

/// Two prefixes are equivalent iff they contain the same number of `>` after
/// all spaces are removed.
pub fn equivalent(a: &str, b: &str) -> bool {
    depth(a) == depth(b)
}

/// Canonical rendering of a prefix of the given depth: `"> "` per level.
///
/// `formatted(3)` is `"> > > "`; `formatted(0)` is the empty string.
pub fn formatted(depth: usize) -> String {
    "> ".repeat(depth)
}

/// Canonical prefix-only line of the given depth, with no trailing space.
///
/// Used for blank lines inside a blockquoted region: `formatted_bare(2)` is
/// `"> >"`.
pub fn formatted_bare(depth: usize) -> String {
    let mut s = formatted(depth);
    while s.ends_with(' ') {
        s.pop();
    }
    s
}

/// Leading-space count of a string.
pub fn indent_width(s: &str) -> usize {
    s.len() - s.trim_start_matches(' ').len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix("> quoted"), ("> ", "quoted"));
        assert_eq!(split_prefix(">quoted"), (">", "quoted"));
        assert_eq!(split_prefix("> > nested"), ("> > ", "nested"));
        assert_eq!(split_prefix(">> nested"), (">> ", "nested"));
        assert_eq!(split_prefix("plain"), ("", "plain"));
        assert_eq!(split_prefix(""), ("", ""));
        assert_eq!(split_prefix(">"), (">", ""));
        assert_eq!(split_prefix("> "), ("> ", ""));
    }

    #[test]
    fn test_split_prefix_keeps_inner_indent() {
        assert_eq!(split_prefix("> >     if (x) {"), ("> > ", "    if (x) {"));
        assert_eq!(split_prefix(">   three"), ("> ", "  three"));
    }

    #[test]
    fn test_depth_and_equivalence() {
        assert_eq!(depth("> > "), 2);
        assert_eq!(depth(">>"), 2);
        assert_eq!(depth(""), 0);
        assert!(equivalent(">>", "> > "));
        assert!(equivalent("", ""));
        assert!(!equivalent(">", ">>"));
    }

    #[test]
    fn test_formatted() {
        assert_eq!(formatted(0), "");
        assert_eq!(formatted(2), "> > ");
        assert_eq!(formatted_bare(2), "> >");
        assert_eq!(formatted_bare(0), "");
    }

    #[test]
    fn test_indent_width() {
        assert_eq!(indent_width("    code"), 4);
        assert_eq!(indent_width("text"), 0);
        assert_eq!(indent_width(""), 0);
    }

    #[test]
    fn test_mid_line_markers_are_not_prefixes() {
        assert_eq!(split_prefix("a > b"), ("", "a > b"));
        assert!(!has_prefix(" > indented"));
    }
}
