//! Pass D: style `----- Original Message -----` separators.
//!
//! The dashed separators survive as thematic breaks or broken emphasis once
//! rendered; a bold Unicode rule reads better and cannot be misparsed. The
//! separator keeps the blockquote prefix of the line it replaces.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::fences::FenceTracker;
use regex::Regex;
use std::sync::LazyLock;

/// Pattern: a dashed separator, possibly nested in a blockquote.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:> ?)*)-{3,}\s*(Original Message|Forwarded Message)\s*-{3,}$").unwrap());

pub struct SeparatorStyle;

impl BodyPass for SeparatorStyle {
    fn name(&self) -> &'static str {
        "separator-style"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let mut fences = FenceTracker::new();
        let mut out: Vec<String> = Vec::new();
        for line in input.lines() {
            if fences.observe(line) {
                out.push(line.to_string());
                continue;
            }
            if let Some(caps) = SEPARATOR_RE.captures(line) {
                let prefix = caps.get(1).map_or("", |m| m.as_str());
                let kind = caps.get(2).map_or("", |m| m.as_str());
                // Inside a blockquote a blank line would break continuity.
                if prefix.is_empty() && out.last().is_some_and(|prev| !prev.trim().is_empty()) {
                    out.push(String::new());
                }
                out.push(format!("{prefix}**\u{2500}\u{2500}\u{2500}\u{2500}\u{2500} {kind} \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}**"));
            } else {
                out.push(line.to_string());
            }
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
