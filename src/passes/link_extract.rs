//! Pass A: replace anchor markup with bare URLs or Markdown links.
//!
//! The archive injects `<a href="...">text</a>` elements into the
//! preformatted body for anything that looks like a URL. Each anchor is
//! replaced according to where it sits and what it points at; archive URLs
//! can additionally be rewritten to the locally rendered path.

use crate::pipeline::{BodyPass, PassContext};
use regex::Regex;
use std::sync::LazyLock;

/// Pattern: an anchor element, case-insensitive, inner text non-greedy.
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<a\s+href="([^"]*)"[^>]*>(.*?)</a>"#).unwrap());

pub struct LinkExtract;

impl BodyPass for LinkExtract {
    fn name(&self) -> &'static str {
        "link-extract"
    }

    fn apply(&self, ctx: &PassContext<'_>, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        for caps in ANCHOR_RE.captures_iter(input) {
            let whole = caps.get(0).expect("match has a whole group");
            let url = caps.get(1).map_or("", |m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str()).trim();

            // An anchor directly after `(` sits inside a Markdown link the
            // author already wrote; only the URL itself may be substituted.
            let inside_markdown_link = input[..whole.start()].ends_with('(');

            let archive = ctx.archive_url_re.captures(url);
            let final_url = match (&archive, ctx.rewrite_links) {
                (Some(caps), true) => format!(
                    "/{}/{}/{}/{}.html",
                    ctx.config.rendered_prefix, &caps[1], &caps[2], &caps[3]
                ),
                _ => url.to_string(),
            };

            let replacement = if inside_markdown_link {
                final_url
            } else if ctx.rewrite_links && archive.is_some() {
                let caps = archive.as_ref().expect("archive match checked above");
                format!("[{}/{}/{}.html]({})", &caps[1], &caps[2], &caps[3], final_url)
            } else if text == url || text.starts_with("http") {
                final_url
            } else {
                format!("[{text}]({final_url})")
            };

            out.push_str(&input[last..whole.start()]);
            out.push_str(&replacement);
            last = whole.end();
        }
        out.push_str(&input[last..]);
        out
    }
}
