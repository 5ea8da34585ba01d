//! Pass B: entity and whitespace normalization.
//!
//! The archive stores the body HTML-escaped and wraps quoted text in `<i>`
//! markers that would otherwise break blockquote detection. Attachment
//! notices appended by the list software are cut off entirely.

use crate::pipeline::{BodyPass, PassContext};
use regex::Regex;
use std::sync::LazyLock;

/// Pattern: inline italic markers, open or close, case-insensitive.
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?i>").unwrap());

/// Pattern: the first line of a pipermail attachment notice. Everything from
/// here to the end of the body is scaffolding, not message content.
static ATTACHMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^-{10,} next part").unwrap());

pub struct EntityNormalize;

impl BodyPass for EntityNormalize {
    fn name(&self) -> &'static str {
        "entities"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let stripped = ITALIC_RE.replace_all(input, "");
        let decoded = html_escape::decode_html_entities(stripped.as_ref());
        let mut text = decoded.replace('\u{00A0}', " ");
        if let Some(m) = ATTACHMENT_RE.find(&text) {
            text.truncate(m.start());
        }
        text
    }
}
