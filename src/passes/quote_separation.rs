//! Pass G: blank line between a blockquote and following plain text.
//!
//! Without the blank, CommonMark lazy continuation pulls the plain line into
//! the quote.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::fences::FenceTracker;

pub struct QuoteSeparation;

impl BodyPass for QuoteSeparation {
    fn name(&self) -> &'static str {
        "quote-separation"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::new();

        for (i, line) in lines.iter().enumerate() {
            let passthrough = fences.observe(line);
            out.push(line.to_string());
            if passthrough {
                continue;
            }
            if blockquote::has_prefix(line)
                && let Some(next) = lines.get(i + 1)
                && !next.trim().is_empty()
                && !blockquote::has_prefix(next)
            {
                out.push(String::new());
            }
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
