//! Per-link content extraction.
//!
//! Each candidate URL gets its own page open/read/close cycle; a link that
//! fails to load or yields nothing is logged and skipped, never fatal to
//! the batch. Output order matches visit order.

use anyhow::Result;
use quarry_common::QuarryError;
use quarry_drivers::quarry_browser::{BrowserPage, BrowserSession, Selector};
use scraper::Html;
use tracing::{debug, warn};

/// Upper bound on the text kept from a single page, in characters.
pub const TEXT_LIMIT: usize = 2000;

/// Separator between per-page texts in the final blob.
pub const RESULT_SEPARATOR: &str = "\n\n---\n\n";

/// Content-bearing elements tried in order before giving up on scoping.
pub const CONTENT_SELECTORS: &[Selector] = &[
    Selector::Css("main"),
    Selector::Css(".content"),
    Selector::Css(".documentation"),
    Selector::Css("article"),
    Selector::Css("body"),
];

/// How to pull text out of a visited page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Read the visible text of the first content-bearing element; mark
    /// truncation with an ellipsis.
    Scoped,
    /// Convert the whole page's markup to text; truncate silently.
    FullPage,
}

/// Text successfully read from one visited page.
#[derive(Debug, Clone)]
pub struct ExtractedResult {
    pub source_url: String,
    pub text: String,
}

/// Visit up to `limit` of `urls` in order and return whatever text could be
/// read. One failing link never aborts the batch.
pub async fn extract_content(
    session: &mut dyn BrowserSession,
    urls: &[String],
    limit: usize,
    mode: ExtractMode,
) -> Vec<ExtractedResult> {
    let mut results = Vec::new();
    for url in urls.iter().take(limit) {
        match extract_one(session, url, mode).await {
            Ok(text) => {
                debug!(target: "web.content", url = %url, len = text.len(), "page text extracted");
                results.push(ExtractedResult {
                    source_url: url.clone(),
                    text,
                });
            }
            Err(error) => {
                warn!(target: "web.content", url = %url, %error, "skipping link");
            }
        }
    }
    results
}

async fn extract_one(
    session: &mut dyn BrowserSession,
    url: &str,
    mode: ExtractMode,
) -> Result<String> {
    let page = session.open(url).await?;
    let outcome = read_text(page.as_ref(), url, mode).await;
    if let Err(error) = page.close().await {
        warn!(target: "web.content", url = %url, %error, "failed to close page");
    }
    outcome
}

async fn read_text(page: &dyn BrowserPage, url: &str, mode: ExtractMode) -> Result<String> {
    let raw = match mode {
        ExtractMode::Scoped => page
            .first_text(CONTENT_SELECTORS)
            .await?
            .ok_or_else(|| QuarryError::Extraction(format!("no content element on {url}")))?,
        ExtractMode::FullPage => text_from_html(&page.html().await?),
    };
    if raw.trim().is_empty() {
        return Err(QuarryError::Extraction(format!("empty text on {url}")).into());
    }
    Ok(match mode {
        ExtractMode::Scoped => truncate_marked(&raw),
        ExtractMode::FullPage => truncate_plain(&raw),
    })
}

/// Markup-to-text conversion: text nodes in document order, skipping
/// non-content subtrees, whitespace collapsed.
pub fn text_from_html(html: &str) -> String {
    const SKIPPED: &[&str] = &["script", "style", "noscript", "template", "head"];

    let document = Html::parse_document(html);
    let mut words: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| SKIPPED.contains(&e.name()))
            });
            if !hidden {
                words.extend(text.split_whitespace());
            }
        }
    }
    words.join(" ")
}

fn truncate_marked(text: &str) -> String {
    match cut_at(text, TEXT_LIMIT) {
        Some(cut) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn truncate_plain(text: &str) -> String {
    match cut_at(text, TEXT_LIMIT) {
        Some(cut) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// Byte index of the `limit`-th character, or `None` when the text already
/// fits.
fn cut_at(text: &str, limit: usize) -> Option<usize> {
    text.char_indices().nth(limit).map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_marked("hello"), "hello");
        assert_eq!(truncate_plain("hello"), "hello");
    }

    #[test]
    fn long_text_is_cut_to_the_limit() {
        let long = "x".repeat(TEXT_LIMIT + 500);
        let marked = truncate_marked(&long);
        assert_eq!(marked.chars().count(), TEXT_LIMIT + 3);
        assert!(marked.ends_with("..."));

        let plain = truncate_plain(&long);
        assert_eq!(plain.chars().count(), TEXT_LIMIT);
        assert!(!plain.ends_with("..."));
    }

    #[test]
    fn text_exactly_at_the_limit_gets_no_marker() {
        let exact = "y".repeat(TEXT_LIMIT);
        assert_eq!(truncate_marked(&exact), exact);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let long = "é".repeat(TEXT_LIMIT + 10);
        assert_eq!(truncate_plain(&long).chars().count(), TEXT_LIMIT);
    }

    #[test]
    fn markup_to_text_keeps_body_content_only() {
        let html = r#"
            <html>
              <head><title>ignored</title><style>p { color: red }</style></head>
              <body>
                <script>var hidden = 1;</script>
                <main><h1>DataFrame.filter</h1><p>Filter   rows.</p></main>
              </body>
            </html>
        "#;
        assert_eq!(text_from_html(html), "DataFrame.filter Filter rows.");
    }

    #[test]
    fn markup_to_text_of_empty_page_is_empty() {
        assert_eq!(text_from_html("<html><body></body></html>"), "");
    }
}
