//! Pass F: promote 2-3-space indented code to the 4-space code column.
//!
//! Authors often indent snippets by two or three spaces, which CommonMark
//! reads as paragraph text. When such a line looks like code, the whole run
//! is shifted to the 4-space column, preserving relative indentation, so the
//! fencing passes can pick it up.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::code_heuristic::looks_like_code;
use crate::utils::fences::FenceTracker;
use crate::utils::is_list_item;

/// How many lines a blank may look ahead for more indented code before the
/// region is considered finished.
const BLANK_LOOKAHEAD: usize = 3;

pub struct LightIndentCode;

/// Whether an indented code-like line follows within the look-ahead window.
fn code_resumes_ahead(lines: &[&str], from: usize) -> bool {
    lines
        .iter()
        .skip(from)
        .take(BLANK_LOOKAHEAD)
        .any(|line| blockquote::indent_width(line) >= 1 && looks_like_code(line.trim()))
}

impl BodyPass for LightIndentCode {
    fn name(&self) -> &'static str {
        "light-indent-code"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::new();
        // (base indent, shift to reach the code column)
        let mut region: Option<(usize, usize)> = None;

        for (i, line) in lines.iter().enumerate() {
            if fences.observe(line) {
                region = None;
                out.push(line.to_string());
                continue;
            }

            let trimmed = line.trim();
            let indent = blockquote::indent_width(line);

            if let Some((base, offset)) = region {
                if trimmed.is_empty() {
                    if !code_resumes_ahead(&lines, i + 1) {
                        region = None;
                    }
                    out.push(String::new());
                    continue;
                }
                if !blockquote::has_prefix(line) && (indent >= base || (indent >= 1 && looks_like_code(trimmed))) {
                    out.push(format!("{}{line}", " ".repeat(offset)));
                    continue;
                }
                region = None;
                // Falls through: the line may itself start a new region.
            }

            if (2..=3).contains(&indent)
                && !blockquote::has_prefix(line)
                && !is_list_item(trimmed)
                && looks_like_code(trimmed)
            {
                let offset = 4 - indent;
                region = Some((indent, offset));
                if out
                    .last()
                    .is_some_and(|prev| !prev.trim().is_empty() && blockquote::indent_width(prev) < 4)
                {
                    out.push(String::new());
                }
                out.push(format!("{}{line}", " ".repeat(offset)));
            } else {
                out.push(line.to_string());
            }
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
