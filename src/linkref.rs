//! Numbered link references, mailing-list style.
//!
//! Authors cite URLs as `[1]` in the prose and park the targets at the end of
//! the message as `[1] https://...` lines. During rendering those trailing
//! reference paragraphs are lifted into a table, inline `[n]` occurrences
//! become superscript links, and a References section is appended.

use pulldown_cmark::{Event, Parser, Tag, TagEnd, TextMergeStream};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Pattern: one reference line, the whole line: `[n] URL`.
static REF_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d+)]\s+(https?://\S+)\s*$").unwrap());

/// Pattern: an inline reference `[n]` in running text.
static INLINE_REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(\d+)\]").unwrap());

/// Reference number to URL, ordered numerically for the References section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkReferences {
    table: BTreeMap<u64, String>,
}

impl LinkReferences {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn get(&self, number: u64) -> Option<&str> {
        self.table.get(&number).map(String::as_str)
    }

    /// The rendered References section: a rule, then the targets in numeric
    /// order.
    fn render_section(&self) -> String {
        let mut html = String::from("\n<hr />\n<div class=\"link-references\">\n<p><strong>References:</strong></p>\n<ol>\n");
        for url in self.table.values() {
            let href = html_escape::encode_double_quoted_attribute(url);
            let text = html_escape::encode_text(url);
            html.push_str(&format!("<li><a href=\"{href}\">{text}</a></li>\n"));
        }
        html.push_str("</ol>\n</div>\n");
        html
    }
}

/// Split trailing reference paragraphs off a Markdown document.
///
/// Walks the top-level blocks from the end: while the last block is made
/// entirely of `[n] URL` lines it is absorbed into the table and removed
/// (first occurrence of a number wins). The walk stops at the first block
/// that is neither blank nor a reference paragraph.
pub fn collect(markdown: &str) -> (String, LinkReferences) {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut refs = LinkReferences::default();
    let mut end = lines.len();

    loop {
        let mut block_end = end;
        while block_end > 0 && lines[block_end - 1].trim().is_empty() {
            block_end -= 1;
        }
        let mut block_start = block_end;
        while block_start > 0 && !lines[block_start - 1].trim().is_empty() {
            block_start -= 1;
        }
        if block_start == block_end {
            break;
        }
        let block = &lines[block_start..block_end];
        if !block.iter().all(|line| REF_LINE_RE.is_match(line)) {
            break;
        }
        for line in block {
            let caps = REF_LINE_RE.captures(line).expect("every block line matched");
            if let Ok(number) = caps[1].parse::<u64>() {
                refs.table.entry(number).or_insert_with(|| caps[2].to_string());
            }
        }
        end = block_start;
    }

    let mut body: String = lines[..end].join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    (body, refs)
}

/// Replace `[n]` occurrences that resolve in the table with superscript link
/// events; everything else stays literal text.
fn rewrite_text<'a>(text: &str, refs: &LinkReferences, events: &mut Vec<Event<'a>>) {
    let mut last = 0;
    for caps in INLINE_REF_RE.captures_iter(text) {
        let whole = caps.get(0).expect("match has a whole group");
        let Some(url) = caps[1].parse::<u64>().ok().and_then(|n| refs.get(n)) else {
            continue;
        };
        if whole.start() > last {
            events.push(Event::Text(text[last..whole.start()].to_string().into()));
        }
        let href = html_escape::encode_double_quoted_attribute(url);
        events.push(Event::InlineHtml(
            format!("<sup><a href=\"{href}\">[{}]</a></sup>", &caps[1]).into(),
        ));
        last = whole.end();
    }
    if last < text.len() {
        events.push(Event::Text(text[last..].to_string().into()));
    }
}

/// Render normalized Markdown to HTML with the link-reference extension.
pub fn render_html(markdown: &str) -> String {
    let (body, refs) = collect(markdown);
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut in_code_block = false;

    for event in TextMergeStream::new(Parser::new(&body)) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(event);
            }
            Event::Text(ref text) if !in_code_block && !refs.is_empty() => {
                rewrite_text(text, &refs, &mut events);
            }
            other => events.push(other),
        }
    }

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    if !refs.is_empty() {
        html.push_str(&refs.render_section());
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collect_trailing_references() {
        let md = "See docs[1] and example[2].\n\n[1] https://a.test/docs\n[2] https://a.test/example\n";
        let (body, refs) = collect(md);
        assert_eq!(body, "See docs[1] and example[2].\n");
        assert_eq!(refs.get(1), Some("https://a.test/docs"));
        assert_eq!(refs.get(2), Some("https://a.test/example"));
    }

    #[test]
    fn test_collect_multiple_paragraphs_with_blank_between() {
        let md = "text\n\n[1] https://a.test/one\n\n[2] https://a.test/two\n";
        let (body, refs) = collect(md);
        assert_eq!(body, "text\n");
        assert_eq!(refs.get(1), Some("https://a.test/one"));
        assert_eq!(refs.get(2), Some("https://a.test/two"));
    }

    #[test]
    fn test_collect_stops_at_prose() {
        let md = "[1] https://a.test/one\n\nclosing words\n";
        let (body, refs) = collect(md);
        assert_eq!(body, "[1] https://a.test/one\n\nclosing words\n");
        assert!(refs.is_empty());
    }

    #[test]
    fn test_collect_duplicate_keeps_first_seen() {
        let md = "text\n\n[1] https://a.test/later\n\n[1] https://a.test/earlier\n";
        let (_, refs) = collect(md);
        // Walking back from the end, the final paragraph is seen first.
        assert_eq!(refs.get(1), Some("https://a.test/earlier"));
    }

    #[test]
    fn test_render_superscript_links() {
        let md = "See docs[1] and example[2].\n\n[1] https://a.test/docs\n[2] https://a.test/example\n";
        let html = render_html(md);
        assert!(html.contains("<sup><a href=\"https://a.test/docs\">[1]</a></sup>"));
        assert!(html.contains("<sup><a href=\"https://a.test/example\">[2]</a></sup>"));
        assert!(html.contains("<div class=\"link-references\">"));
        assert!(html.contains("<li><a href=\"https://a.test/docs\">https://a.test/docs</a></li>"));
        assert!(html.contains("<li><a href=\"https://a.test/example\">https://a.test/example</a></li>"));
        assert!(!html.contains("[1] https://a.test/docs"));
    }

    #[test]
    fn test_unresolved_reference_stays_text() {
        let md = "See note[7].\n\n[1] https://a.test/docs\n";
        let html = render_html(md);
        assert!(html.contains("note[7]"));
        assert!(!html.contains("<sup><a href=\"https://a.test/docs\">[7]</a></sup>"));
    }

    #[test]
    fn test_no_references_no_section() {
        let html = render_html("plain paragraph\n");
        assert!(!html.contains("link-references"));
        assert!(html.contains("<p>plain paragraph</p>"));
    }

    #[test]
    fn test_references_inside_code_are_untouched() {
        let md = "```\nargs[1]\n```\n\n[1] https://a.test/docs\n";
        let html = render_html(md);
        assert!(html.contains("args[1]"));
        assert!(!html.contains("<sup><a href=\"https://a.test/docs\">[1]</a></sup>"));
    }

    #[test]
    fn test_numeric_order_in_section() {
        let md = "x[2] y[10] z[1]\n\n[2] https://a.test/b\n[10] https://a.test/j\n[1] https://a.test/a\n";
        let html = render_html(md);
        let a = html.find("<li><a href=\"https://a.test/a\"").unwrap();
        let b = html.find("<li><a href=\"https://a.test/b\"").unwrap();
        let j = html.find("<li><a href=\"https://a.test/j\"").unwrap();
        assert!(a < b && b < j);
    }
}
