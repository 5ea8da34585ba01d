//! The mail-body normalization pipeline.
//!
//! A fixed sequence of pure text passes turns the raw preformatted body of an
//! archived message into Markdown. Every pass is total over strings and the
//! pipeline is a fixed point from the second run onward, so callers may
//! re-normalize already-normalized output safely.

use crate::config::ArchiveConfig;
use crate::passes;
use log::debug;
use regex::Regex;

/// Identifies the message a body belongs to; used for logging and available
/// to passes that care about the message's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageMeta<'a> {
    pub list: &'a str,
    /// `YYYY-Month`, with the month spelled in English.
    pub year_month: &'a str,
    pub id: &'a str,
}

/// Per-run state handed to each pass.
pub struct PassContext<'a> {
    pub config: &'a ArchiveConfig,
    pub meta: &'a MessageMeta<'a>,
    pub rewrite_links: bool,
    /// Compiled once per [`Normalizer`]; captures `(list, year-month, id)`.
    pub archive_url_re: &'a Regex,
}

/// One stage of the pipeline: a pure transformation of the whole body.
pub trait BodyPass: Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, ctx: &PassContext<'_>, input: &str) -> String;
}

/// Pipeline order is load-bearing: renesting needs decoded entities and
/// normalized quote spacing; the fencing passes need promoted indentation and
/// the blank lines the separation pass inserts.
static PASSES: [&(dyn BodyPass); 13] = [
    &passes::link_extract::LinkExtract,
    &passes::entities::EntityNormalize,
    &passes::blockquote_spacing::BlockquoteSpacing,
    &passes::separator_style::SeparatorStyle,
    &passes::header_renest::HeaderRenest,
    &passes::light_indent_code::LightIndentCode,
    &passes::quote_separation::QuoteSeparation,
    &passes::wrap_orphans::WrapOrphans,
    &passes::continuation_orphans::ContinuationOrphans,
    &passes::tidy::Tidy,
    &passes::fenced_code::FencedCode,
    &passes::list_item_code::ListItemCode,
    &passes::column_zero_code::ColumnZeroCode,
];

/// Runs the pipeline for one archive configuration.
pub struct Normalizer {
    config: ArchiveConfig,
    archive_url_re: Regex,
}

impl Normalizer {
    pub fn new(config: ArchiveConfig) -> Self {
        let archive_url_re = Regex::new(&format!(
            r"^https?://{}/{}/([^/]+)/([^/]+)/(\d+)\.html$",
            regex::escape(&config.archive_host),
            regex::escape(&config.archive_prefix),
        ))
        .expect("escaped host and prefix always form a valid pattern");
        Self { config, archive_url_re }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub(crate) fn pass_context<'a>(&'a self, meta: &'a MessageMeta<'a>, rewrite_links: bool) -> PassContext<'a> {
        PassContext {
            config: &self.config,
            meta,
            rewrite_links,
            archive_url_re: &self.archive_url_re,
        }
    }

    /// Normalize one raw preformatted body into Markdown.
    ///
    /// The result ends in exactly one newline, unless the body normalizes to
    /// nothing, in which case it is the empty string.
    pub fn normalize_body(&self, raw: &str, meta: &MessageMeta<'_>, rewrite_links: bool) -> String {
        let ctx = self.pass_context(meta, rewrite_links);
        let mut text = raw.to_string();
        for pass in PASSES {
            let output = pass.apply(&ctx, &text);
            debug!(
                "{}/{}/{}: pass {} ({} -> {} bytes)",
                meta.list,
                meta.year_month,
                meta.id,
                pass.name(),
                text.len(),
                output.len()
            );
            text = output;
        }
        finalize(text)
    }
}

/// Trim outer blank lines and guarantee the single-trailing-newline contract.
fn finalize(text: String) -> String {
    let body = text.trim_matches('\n');
    if body.trim().is_empty() {
        return String::new();
    }
    format!("{body}\n")
}
