//! Pass H: rejoin short fragments created by the archive's hard wrap.
//!
//! The archive wraps bodies near 72 columns, frequently pushing the last word
//! or two onto a line of their own. A very short unindented line directly
//! after a near-full-width line is folded back in.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::fences::FenceTracker;
use crate::utils::is_list_item;
use regex::Regex;
use std::sync::LazyLock;

/// Longest fragment considered an orphan, in characters.
const MAX_ORPHAN: usize = 15;
/// Shortest previous line that can have produced one, in characters.
const MIN_LONG: usize = 65;

/// Pattern: a signature or greeting ending, which legitimately sits on a
/// short following line (`regards,\nRémi`).
static SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(regards|cheers|thanks|thank you|best|sincerely|cordialement|greetings),?\s*$").unwrap()
});

pub struct WrapOrphans;

fn is_orphan(prev: &str, cur: &str) -> bool {
    let Some(first) = cur.chars().next() else {
        return false;
    };
    if first.is_whitespace() || first == '>' || cur.starts_with("```") || is_list_item(cur) {
        return false;
    }
    if cur.chars().count() > MAX_ORPHAN {
        return false;
    }
    // Only paragraph text re-wraps here: indented and list lines belong to
    // the continuation pass, quoted lines never adopt unquoted fragments.
    if prev.starts_with(char::is_whitespace) || is_list_item(prev.trim_start()) || blockquote::has_prefix(prev) {
        return false;
    }
    let prev = prev.trim_end();
    prev.chars().count() >= MIN_LONG && !SIGNATURE_RE.is_match(prev)
}

impl BodyPass for WrapOrphans {
    fn name(&self) -> &'static str {
        "wrap-orphans"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut fences = FenceTracker::new();
        let mut prev_mergeable = false;

        for line in input.lines() {
            if fences.observe(line) {
                out.push(line.to_string());
                prev_mergeable = false;
                continue;
            }
            if prev_mergeable
                && let Some(prev) = out.last_mut()
                && is_orphan(prev, line)
            {
                // Chained merges keep testing against the grown line.
                let merged = format!("{} {line}", prev.trim_end());
                *prev = merged;
                continue;
            }
            out.push(line.to_string());
            prev_mergeable = true;
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
