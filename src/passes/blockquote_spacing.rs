//! Pass C: ensure a space between the last blockquote marker and content.
//!
//! Later passes split lines on the `>` prefix and rely on `> ` spacing; this
//! runs before any of them consult blockquote structure.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::fences::FenceTracker;
use regex::Regex;
use std::sync::LazyLock;

/// Pattern: a blockquote marker run directly followed by content with no
/// separating space. The run is greedy, so only the final `>` gets the space.
static NO_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^((?:>\s?)*>)([^\s>].*)$").unwrap());

pub struct BlockquoteSpacing;

impl BodyPass for BlockquoteSpacing {
    fn name(&self) -> &'static str {
        "blockquote-spacing"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let mut fences = FenceTracker::new();
        let out: Vec<String> = input
            .lines()
            .map(|line| {
                if fences.observe(line) {
                    line.to_string()
                } else {
                    NO_SPACE_RE.replace(line, "$1 $2").into_owned()
                }
            })
            .collect();
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
