//! The shared "looks like code" predicate.
//!
//! Archive bodies carry Java-flavored snippets with no markup at all; several
//! passes need to decide whether a trimmed line is code before promoting it
//! into a fenced block. The predicate is deliberately syntactic: operator
//! tokens, call/generic shapes and declaration shapes count, bare keywords do
//! not (prose about a language is full of keywords).

use regex::Regex;
use std::sync::LazyLock;

/// Operator and punctuation tokens that only show up in code.
const CODE_TOKENS: &[&str] = &[
    "->", "=>", "==", "!=", "<=", ">=", "&&", "||", "{", "}", "/*", "*/", "++",
];

/// Pattern: an email header line, optionally bold-wrapped. These are never
/// code, no matter how they are indented.
static EMAIL_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\*?(from|to|cc|bcc|subject|sent|date|reply-to):").unwrap());

/// Pattern: a Markdown link `[text](url)`, removed before any code test so
/// that URLs and link labels cannot trip the operator checks.
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]\([^)]*\)").unwrap());

/// Pattern: `--` adjacent to a word character (`a--`, `--a`). Kept narrow so
/// that `--` signature separators on their own line never match.
static WORD_ADJACENT_DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w--|--\w").unwrap());

/// Pattern: an identifier immediately followed by an opening parenthesis.
static CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)\(").unwrap());

/// Pattern: a two-element parenthesized tuple `(x, y)`.
static TUPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*[A-Za-z0-9_]+\s*,\s*[A-Za-z0-9_]+\s*\)").unwrap());

/// Pattern: a generic call `<T>(`.
static GENERIC_CALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[A-Za-z_][A-Za-z0-9_]*>\s*\(").unwrap());

/// Pattern: a generic type usage `Identifier<T>` (`List<String>`, `Map<K, V>`).
static GENERIC_TYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Za-z0-9_]*<[A-Za-z_][A-Za-z0-9_, ]*>").unwrap());

/// Pattern: a typed variable declaration `TYPE name =` where `TYPE` is a
/// primitive keyword or an identifier with optional generics. The trailing
/// `[^=]` keeps plain `==` comparisons out of this rule (they are caught by
/// the token list instead).
static TYPED_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:int|long|double|float|boolean|char|byte|short|var|String|[A-Za-z_][A-Za-z0-9_]*(?:<[^<>]*>)?)\s+[A-Za-z_][A-Za-z0-9_]*\s*=([^=]|$)",
    )
    .unwrap()
});

/// Pattern: a simple assignment statement `ident = ident;`.
static SIMPLE_ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\s*=\s*[A-Za-z_][A-Za-z0-9_.]*\s*;$").unwrap());

/// Pattern: a bare declaration `TypeName ident;`.
static BARE_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\s+[A-Za-z_][A-Za-z0-9_]*;$").unwrap());

/// Whether a trimmed line is an email header (`From:`, `Subject:`, ...).
pub fn is_email_header(trimmed: &str) -> bool {
    EMAIL_HEADER_RE.is_match(trimmed)
}

/// A `//` comment marker, excluding the `://` of URLs.
fn has_comment_marker(s: &str) -> bool {
    let bytes = s.as_bytes();
    s.match_indices("//").any(|(i, _)| i == 0 || bytes[i - 1] != b':')
}

/// An identifier-call `name(` that is not Big-O notation (`O(...)`, `o(...)`),
/// with a closing parenthesis somewhere after it.
fn has_method_call(s: &str) -> bool {
    CALL_RE.captures_iter(s).any(|caps| {
        let ident = caps.get(1).map_or("", |m| m.as_str());
        ident != "O" && ident != "o" && s[caps.get(0).map_or(0, |m| m.end())..].contains(')')
    })
}

/// Whether a trimmed, non-empty line looks like code.
///
/// Email headers never do. Markdown links are stripped before any test so a
/// bare URL (`https://...`) does not count as a comment marker.
pub fn looks_like_code(trimmed: &str) -> bool {
    if trimmed.is_empty() || is_email_header(trimmed) {
        return false;
    }
    let stripped = MARKDOWN_LINK_RE.replace_all(trimmed, "");
    let s = stripped.as_ref();

    if CODE_TOKENS.iter().any(|tok| s.contains(tok)) {
        return true;
    }
    if has_comment_marker(s) || WORD_ADJACENT_DASHES_RE.is_match(s) {
        return true;
    }
    if has_method_call(s) || TUPLE_RE.is_match(s) || GENERIC_CALL_RE.is_match(s) || GENERIC_TYPE_RE.is_match(s) {
        return true;
    }
    TYPED_DECL_RE.is_match(s) || SIMPLE_ASSIGN_RE.is_match(s) || BARE_DECL_RE.is_match(s)
}
