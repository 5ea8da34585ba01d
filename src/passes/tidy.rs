//! Mid-pipeline cleanup: right-trim lines, collapse blank runs.
//!
//! Runs after the joining passes so the fencing passes see at most one blank
//! line between blocks, which keeps their look-aheads simple.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::fences::FenceTracker;

pub struct Tidy;

impl BodyPass for Tidy {
    fn name(&self) -> &'static str {
        "tidy"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let mut fences = FenceTracker::new();
        let mut out: Vec<String> = Vec::new();
        for line in input.lines() {
            if fences.observe(line) {
                out.push(line.to_string());
                continue;
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() && out.last().is_some_and(|prev| prev.is_empty()) {
                continue;
            }
            out.push(trimmed.to_string());
        }
        // Leading and trailing blank lines carry nothing.
        while out.first().is_some_and(|l| l.is_empty()) {
            out.remove(0);
        }
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::plain_ctx;

    fn run(input: &str) -> String {
        plain_ctx(|ctx| Tidy.apply(ctx, input))
    }

    #[test]
    fn test_blank_runs_collapse() {
        assert_eq!(run("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_trailing_whitespace_stripped() {
        assert_eq!(run("a   \nb\t"), "a\nb");
    }

    #[test]
    fn test_edges_trimmed() {
        assert_eq!(run("\n\na\n\n"), "a\n");
    }

    #[test]
    fn test_fenced_blank_runs_kept() {
        let input = "```\na\n\n\nb\n```";
        assert_eq!(run(input), input);
    }
}
