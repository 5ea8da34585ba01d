//! Pass K: fence code runs inside list items.
//!
//! Code under a list marker is indented relative to the marker, which the
//! plain fencing pass deliberately leaves alone. Runs of code-like lines are
//! wrapped in a fence indented to the item's text column, so the block stays
//! attached to its list item.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::code_heuristic::looks_like_code;
use crate::utils::fences::is_fence_marker;
use crate::utils::{CLOSING_PUNCT_RE, is_list_item};

pub struct ListItemCode;

struct CodeRun {
    /// Fence and content column: the item's text alignment.
    list_indent: usize,
    /// Indent of the first code line; later lines keep their offset from it.
    base_indent: usize,
    /// (original indent, trimmed content)
    lines: Vec<(usize, String)>,
}

fn flush(out: &mut Vec<String>, run: &mut Option<CodeRun>) {
    let Some(run) = run.take() else { return };
    let pad = " ".repeat(run.list_indent);
    out.push(format!("{pad}```"));
    for (indent, text) in &run.lines {
        let column = run.list_indent + indent.saturating_sub(run.base_indent);
        out.push(format!("{}{text}", " ".repeat(column)));
    }
    out.push(format!("{pad}```"));
}

impl BodyPass for ListItemCode {
    fn name(&self) -> &'static str {
        "list-item-code"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut in_fenced = false;
        // Column of the current list marker, when inside an item.
        let mut marker_col: Option<usize> = None;
        let mut run: Option<CodeRun> = None;

        for line in input.lines() {
            if is_fence_marker(line) {
                flush(&mut out, &mut run);
                in_fenced = !in_fenced;
                out.push(line.to_string());
                continue;
            }
            if in_fenced {
                out.push(line.to_string());
                continue;
            }

            let trimmed = line.trim();
            if blockquote::has_prefix(line) {
                flush(&mut out, &mut run);
                marker_col = None;
                out.push(line.to_string());
                continue;
            }
            if is_list_item(trimmed) {
                flush(&mut out, &mut run);
                marker_col = Some(blockquote::indent_width(line));
                out.push(line.to_string());
                continue;
            }
            let Some(col) = marker_col else {
                out.push(line.to_string());
                continue;
            };
            if trimmed.is_empty() {
                flush(&mut out, &mut run);
                out.push(line.to_string());
                continue;
            }
            let indent = blockquote::indent_width(line);
            if indent <= col {
                flush(&mut out, &mut run);
                marker_col = None;
                out.push(line.to_string());
                continue;
            }
            let continues_run =
                run.is_some() && (CLOSING_PUNCT_RE.is_match(trimmed) || trimmed.starts_with("//"));
            if looks_like_code(trimmed) || continues_run {
                let run = run.get_or_insert_with(|| CodeRun {
                    list_indent: (col + 2).max(2),
                    base_indent: indent,
                    lines: Vec::new(),
                });
                run.lines.push((indent, trimmed.to_string()));
            } else {
                flush(&mut out, &mut run);
                out.push(line.to_string());
            }
        }
        flush(&mut out, &mut run);
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
