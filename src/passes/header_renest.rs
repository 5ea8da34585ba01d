//! Pass E: convert indented forwarded-email headers into deeper blockquotes.
//!
//! A forwarded message quoted inside a reply shows up as an indented run of
//! `From:` / `Sent:` / `Subject:` lines (and its indented body) inside the
//! enclosing blockquote. Re-nesting that run one level deeper keeps the
//! forwarded material visually attached to its headers instead of collapsing
//! into the surrounding quote.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::code_heuristic::{is_email_header, looks_like_code};
use crate::utils::fences::FenceTracker;

/// How far a blank line may look ahead for more indented content before the
/// email context is considered closed.
const BLANK_LOOKAHEAD: usize = 5;

pub struct HeaderRenest;

struct EmailContext {
    prefix: String,
    indent_level: usize,
}

/// Whether any of the next few lines continues the forwarded block: same
/// blockquote prefix, content indented at least to the header level.
fn more_content_ahead(lines: &[&str], from: usize, ctx: &EmailContext) -> bool {
    for line in lines.iter().skip(from).take(BLANK_LOOKAHEAD) {
        if !blockquote::has_prefix(line) {
            return false;
        }
        let (prefix, rest) = blockquote::split_prefix(line);
        if !blockquote::equivalent(prefix, &ctx.prefix) {
            return false;
        }
        if !rest.trim().is_empty() {
            return blockquote::indent_width(rest) >= ctx.indent_level;
        }
    }
    false
}

impl BodyPass for HeaderRenest {
    fn name(&self) -> &'static str {
        "header-renest"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut fences = FenceTracker::new();
        let mut context: Option<EmailContext> = None;

        for (i, line) in lines.iter().enumerate() {
            if fences.observe(line) {
                out.push(line.to_string());
                continue;
            }
            if !blockquote::has_prefix(line) {
                context = None;
                out.push(line.to_string());
                continue;
            }

            let (prefix, rest) = blockquote::split_prefix(line);
            let trimmed = rest.trim();
            let indent = blockquote::indent_width(rest);

            // Code keeps its own indentation; the fencing passes own it.
            if !trimmed.is_empty() && looks_like_code(trimmed) {
                out.push(line.to_string());
                continue;
            }

            match context.take() {
                None => {
                    if indent >= 4 && is_email_header(trimmed) {
                        out.push(format!("{prefix}> {trimmed}"));
                        context = Some(EmailContext {
                            prefix: prefix.to_string(),
                            indent_level: indent,
                        });
                    } else {
                        out.push(line.to_string());
                    }
                }
                Some(email) if blockquote::equivalent(prefix, &email.prefix) => {
                    if trimmed.is_empty() {
                        if more_content_ahead(&lines, i + 1, &email) {
                            out.push(blockquote::formatted_bare(blockquote::depth(prefix) + 1));
                        } else {
                            out.push(line.to_string());
                        }
                    } else if indent >= email.indent_level {
                        let levels = 1 + (indent - email.indent_level) / 4;
                        out.push(format!("{prefix}{}{trimmed}", "> ".repeat(levels)));
                    } else {
                        // Shallower content: enclosing quote text.
                        out.push(line.to_string());
                    }
                    context = Some(email);
                }
                Some(_) => {
                    out.push(line.to_string());
                }
            }
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
