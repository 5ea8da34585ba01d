//! Pass L: fence runs of code-like lines at column 0, quoted or not.
//!
//! Authors paste snippets flush left, and quoted code keeps only its
//! blockquote prefix after the archive strips tabs. A run of at least two
//! code-like lines under one prefix becomes a fenced block carrying that
//! prefix; single code-like lines in prose are left alone.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::code_heuristic::{is_email_header, looks_like_code};
use crate::utils::fences::is_fence_marker;
use crate::utils::is_list_item;

/// Minimum number of code-like lines before a run is worth fencing.
const MIN_RUN: usize = 2;

pub struct ColumnZeroCode;

struct CodeRun {
    depth: usize,
    /// (original line, content after the prefix)
    lines: Vec<(String, String)>,
    /// Code-like lines seen; blanks and indented continuations don't count.
    count: usize,
}

fn flush(out: &mut Vec<String>, run: &mut Option<CodeRun>) {
    let Some(run) = run.take() else { return };
    if run.count < MIN_RUN {
        for (original, _) in run.lines {
            out.push(original);
        }
        return;
    }
    let prefix = blockquote::formatted(run.depth);
    let bare = blockquote::formatted_bare(run.depth);
    let min_indent = run
        .lines
        .iter()
        .filter(|(_, rest)| !rest.trim().is_empty())
        .map(|(_, rest)| blockquote::indent_width(rest))
        .min()
        .unwrap_or(0);
    out.push(format!("{prefix}```"));
    for (_, rest) in &run.lines {
        if rest.trim().is_empty() {
            out.push(bare.clone());
        } else {
            out.push(format!("{prefix}{}", &rest[min_indent..]));
        }
    }
    out.push(format!("{prefix}```"));
}

/// Whether the next non-blank line continues a run at this depth: same
/// prefix, and either code-like or indented.
fn more_code_ahead(lines: &[&str], from: usize, depth: usize) -> bool {
    for line in lines.iter().skip(from) {
        if is_fence_marker(line) {
            return false;
        }
        let (prefix, rest) = blockquote::split_prefix(line);
        let trimmed = rest.trim();
        if trimmed.is_empty() {
            continue;
        }
        return blockquote::depth(prefix) == depth
            && !is_email_header(trimmed)
            && (looks_like_code(trimmed) || blockquote::indent_width(rest) >= 4);
    }
    false
}

impl BodyPass for ColumnZeroCode {
    fn name(&self) -> &'static str {
        "column-zero-code"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut in_fenced = false;
        let mut run: Option<CodeRun> = None;

        for (i, line) in lines.iter().enumerate() {
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

            let (prefix, rest) = blockquote::split_prefix(line);
            let depth = blockquote::depth(prefix);
            let trimmed = rest.trim();
            let indent = blockquote::indent_width(rest);

            if is_list_item(trimmed) {
                flush(&mut out, &mut run);
                out.push(line.to_string());
                continue;
            }

            if trimmed.is_empty() {
                let continues = run
                    .as_ref()
                    .is_some_and(|r| r.depth == depth && more_code_ahead(&lines, i + 1, r.depth));
                if continues {
                    if let Some(r) = run.as_mut() {
                        r.lines.push((line.to_string(), String::new()));
                    }
                } else {
                    flush(&mut out, &mut run);
                    out.push(line.to_string());
                }
                continue;
            }

            let code = looks_like_code(trimmed);

            if indent >= 4 {
                let joins = run.as_ref().is_some_and(|r| r.depth == depth) && !is_email_header(trimmed);
                if joins {
                    if let Some(r) = run.as_mut() {
                        if code {
                            r.count += 1;
                        }
                        r.lines.push((line.to_string(), rest.to_string()));
                    }
                } else if code {
                    flush(&mut out, &mut run);
                    run = Some(CodeRun {
                        depth,
                        lines: vec![(line.to_string(), rest.to_string())],
                        count: 1,
                    });
                } else {
                    flush(&mut out, &mut run);
                    out.push(line.to_string());
                }
                continue;
            }

            // Unindented content.
            let joins = code && run.as_ref().is_some_and(|r| r.depth == depth);
            if joins {
                if let Some(r) = run.as_mut() {
                    r.count += 1;
                    r.lines.push((line.to_string(), rest.to_string()));
                }
            } else if code && run.is_none() {
                run = Some(CodeRun {
                    depth,
                    lines: vec![(line.to_string(), rest.to_string())],
                    count: 1,
                });
            } else {
                flush(&mut out, &mut run);
                out.push(line.to_string());
            }
        }
        flush(&mut out, &mut run);
        out.join("\n") + if input.ends_with('\n') { "\n" } else { "" }
    }
}
