//! Pass J: convert plain 4-space indented code blocks to fenced blocks.
//!
//! Indented code renders, but a fenced block survives later editing, takes a
//! language tag, and cannot be re-wrapped by accident. List-item code is
//! handled separately (the list pass), and blockquoted code by the
//! column-zero pass; this pass owns the plain document body.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::code_heuristic::is_email_header;
use crate::utils::fences::is_fence_marker;
use crate::utils::{CLOSING_PUNCT_RE, is_list_item};

pub struct FencedCode;

/// Emit the accumulated block: opening fence was written on entry, so this
/// dedents the content by the minimum indent and closes the fence. Wrapped
/// closing punctuation sits at column 0 and is excluded from the minimum.
fn close_block(out: &mut Vec<String>, block: &mut Vec<String>) {
    let min_indent = block
        .iter()
        .filter(|l| !l.trim().is_empty() && blockquote::indent_width(l) > 0)
        .map(|l| blockquote::indent_width(l))
        .min()
        .unwrap_or(0);
    for line in block.drain(..) {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            let cut = min_indent.min(blockquote::indent_width(&line));
            out.push(line[cut..].to_string());
        }
    }
    out.push("```".to_string());
}

/// A plain indented-code line: four spaces of indentation, not an email
/// header. Email headers stay prose no matter the indent.
fn is_plain_code_line(line: &str) -> bool {
    line.starts_with("    ") && !line.trim().is_empty() && !is_email_header(line.trim())
}

/// Whether the next non-blank line continues the code block.
fn more_code_ahead(lines: &[&str], from: usize) -> bool {
    lines
        .iter()
        .skip(from)
        .find(|l| !l.trim().is_empty())
        .is_some_and(|l| is_plain_code_line(l))
}

impl BodyPass for FencedCode {
    fn name(&self) -> &'static str {
        "fenced-code"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut in_existing_fenced = false;
        let mut in_block = false;
        let mut block: Vec<String> = Vec::new();
        let mut in_list_context = false;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim();

            if is_fence_marker(line) {
                if in_block {
                    close_block(&mut out, &mut block);
                    in_block = false;
                }
                in_existing_fenced = !in_existing_fenced;
                out.push(line.to_string());
                i += 1;
                continue;
            }
            if in_existing_fenced {
                out.push(line.to_string());
                i += 1;
                continue;
            }

            // Lists hold their context across blanks and indented content;
            // their code belongs to the list pass.
            if is_list_item(trimmed) {
                in_list_context = true;
            } else if !trimmed.is_empty() && !line.starts_with(' ') {
                in_list_context = false;
            }

            let code_line = !in_list_context && is_plain_code_line(line);

            if in_block {
                if code_line {
                    block.push(line.to_string());
                    i += 1;
                    continue;
                }
                if trimmed.is_empty() && more_code_ahead(&lines, i + 1) {
                    block.push(String::new());
                    i += 1;
                    continue;
                }
                // A wrapped closing brace lost its indentation; it belongs
                // to the block, not to the prose after it.
                if CLOSING_PUNCT_RE.is_match(trimmed) && !blockquote::has_prefix(line) {
                    block.push(line.to_string());
                    i += 1;
                    continue;
                }
                close_block(&mut out, &mut block);
                in_block = false;
                continue; // re-process the current line
            }

            if code_line {
                if out.last().is_some_and(|prev| !prev.trim().is_empty()) {
                    out.push(String::new());
                }
                out.push("```".to_string());
                block.push(line.to_string());
                in_block = true;
                i += 1;
                continue;
            }

            out.push(line.to_string());
            i += 1;
        }
        if in_block {
            close_block(&mut out, &mut block);
        }
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
