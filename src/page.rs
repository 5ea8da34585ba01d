//! Archived message-page helpers.
//!
//! A pipermail message page is a minimal HTML document whose body lives in a
//! single preformatted region. Only that region and the page title are of
//! interest; everything else is navigation chrome.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Pattern: the first preformatted region, case-insensitive, dotall.
static PRE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<pre[^>]*>(.*?)</pre>").unwrap());

/// Pattern: the page title.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<title>(.*?)</title>").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("archive page has no preformatted body")]
    MissingPreformattedBody,
}

/// The raw preformatted body of an archive page, still entity-encoded.
pub fn extract_preformatted(html: &str) -> Result<&str, PageError> {
    PRE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(PageError::MissingPreformattedBody)
}

/// The page subject from `<title>`, entity-decoded and trimmed.
pub fn page_subject(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str().trim()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head><title>Pattern matching &amp; records</title></head>\n\
        <body><h1>amber-dev</h1>\n<PRE>Hi all,\n&gt; quoted\nbody text\n</PRE>\n</body></html>";

    #[test]
    fn test_extract_preformatted() {
        assert_eq!(extract_preformatted(PAGE), Ok("Hi all,\n&gt; quoted\nbody text\n"));
    }

    #[test]
    fn test_missing_pre_is_an_error() {
        assert_eq!(
            extract_preformatted("<html><body>nothing here</body></html>"),
            Err(PageError::MissingPreformattedBody)
        );
    }

    #[test]
    fn test_page_subject_is_decoded() {
        assert_eq!(page_subject(PAGE).as_deref(), Some("Pattern matching & records"));
    }

    #[test]
    fn test_subject_missing() {
        assert_eq!(page_subject("<pre>x</pre>"), None);
    }
}
