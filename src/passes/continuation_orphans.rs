//! Pass I: rejoin unindented continuations of code and list lines.
//!
//! When the wrap breaks an indented code line or a list item, the
//! continuation lands at column 0 and would render as a separate paragraph.
//! Such a line is folded back when the surrounding shape says it cannot be
//! prose of its own: the next line is blank, indented, or a list marker.

use crate::pipeline::{BodyPass, PassContext};
use crate::utils::blockquote;
use crate::utils::code_heuristic::is_email_header;
use crate::utils::fences::FenceTracker;
use crate::utils::{CLOSING_PUNCT_RE, is_list_item};

pub struct ContinuationOrphans;

fn prev_carries_continuation(prev: &str) -> bool {
    let (_, rest) = blockquote::split_prefix(prev);
    let indent = blockquote::indent_width(rest);
    // Indented email headers are prose, not code, and never adopt lines.
    if indent >= 4 {
        return !is_email_header(rest.trim());
    }
    indent <= 3 && is_list_item(rest.trim_start())
}

fn next_closes_shape(next: Option<&&str>) -> bool {
    match next {
        None => true,
        Some(next) => {
            next.trim().is_empty() || next.starts_with(char::is_whitespace) || is_list_item(next.trim_start())
        }
    }
}

fn is_continuation(cur: &str) -> bool {
    let Some(first) = cur.chars().next() else {
        return false;
    };
    !first.is_whitespace() && first != '>' && !is_list_item(cur) && !CLOSING_PUNCT_RE.is_match(cur)
}

impl BodyPass for ContinuationOrphans {
    fn name(&self) -> &'static str {
        "continuation-orphans"
    }

    fn apply(&self, _ctx: &PassContext<'_>, input: &str) -> String {
        let lines: Vec<&str> = input.lines().collect();
        let mut out: Vec<String> = Vec::new();
        let mut fences = FenceTracker::new();
        let mut prev_mergeable = false;

        for (i, line) in lines.iter().enumerate() {
            if fences.observe(line) {
                out.push(line.to_string());
                prev_mergeable = false;
                continue;
            }
            if prev_mergeable
                && is_continuation(line)
                && next_closes_shape(lines.get(i + 1))
                && let Some(prev) = out.last_mut()
                && prev_carries_continuation(prev)
            {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::plain_ctx;
    use pretty_assertions::assert_eq;

    fn run(input: &str) -> String {
        plain_ctx(|ctx| ContinuationOrphans.apply(ctx, input))
    }

    #[test]
    fn test_code_continuation_joined() {
        let input = "    var result = compute(first,\nsecond);\n\nafter";
        assert_eq!(run(input), "    var result = compute(first, second);\n\nafter");
    }

    #[test]
    fn test_list_item_continuation_joined() {
        let input = "- a list item that wraps\nonto the next line\n\nafter";
        assert_eq!(run(input), "- a list item that wraps onto the next line\n\nafter");
    }

    #[test]
    fn test_not_joined_when_next_is_prose() {
        let input = "    code();\nthis is a new paragraph\nwith more prose";
        assert_eq!(run(input), input);
    }

    #[test]
    fn test_closing_punctuation_is_left_for_fencing() {
        let input = "    call(a,\n});\n\nafter";
        assert_eq!(run(input), input);
    }

    #[test]
    fn test_list_marker_is_not_a_continuation() {
        let input = "- first item\n- second item";
        assert_eq!(run(input), input);
    }

    #[test]
    fn test_quoted_code_adopts_unquoted_continuation() {
        let input = ">     compute(first,\nsecond);\n\nafter";
        assert_eq!(run(input), ">     compute(first, second);\n\nafter");
    }

    #[test]
    fn test_joined_before_following_list() {
        let input = "1. numbered item wrapping\nbadly\n2. next item";
        assert_eq!(run(input), "1. numbered item wrapping badly\n2. next item");
    }

    #[test]
    fn test_continuation_at_end_of_input() {
        let input = "    f(x,\ny);";
        assert_eq!(run(input), "    f(x, y);");
    }
}
