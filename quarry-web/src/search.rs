//! The search tool: the composition root of the retrieval flow.
//!
//! Constructed with its browser dependency injected so embedders (and
//! tests) decide what actually loads pages; nothing is registered at module
//! load time.

use std::sync::Arc;

use anyhow::Result;
use quarry_common::{QuarryConfig, QuarryError};
use quarry_drivers::quarry_browser::{Browser, BrowserPage, BrowserSession};
use tracing::{info, warn};
use url::Url;

use crate::content::{ExtractMode, ExtractedResult, RESULT_SEPARATOR, extract_content};
use crate::links::{container_links, relevant_links};
use crate::locate::locate;

/// Returned when a results container was found but nothing could be read
/// from it or from its links.
pub const NO_CONTENT: &str = "Could not fetch content from search results.";

/// Returned when neither a results container nor any relevant link exists.
pub const NO_RESULTS: &str = "No search results or relevant links found.";

/// Tool description handed to the calling agent alongside the callable.
pub const SEARCH_TOOL_DESCRIPTION: &str = "Searches the Polars documentation website for a query \
     and returns the text content of the top result pages.";

/// Searches the documentation site and returns result-page text.
///
/// One invocation owns one browser session: the search page and every
/// visited result page run in that session, and it is closed exactly once
/// before `search` returns, whatever happened in between.
pub struct SearchTool {
    browser: Arc<dyn Browser>,
    config: QuarryConfig,
}

enum Gathered {
    Container { links: Vec<String> },
    Fallback { links: Vec<String> },
}

impl SearchTool {
    pub fn new(browser: Arc<dyn Browser>, config: QuarryConfig) -> Self {
        Self { browser, config }
    }

    /// Search the documentation site and return the joined text of up to
    /// `top_k` results, or a sentinel message when nothing was found.
    ///
    /// Errors only when the search page itself cannot be loaded (or the
    /// browser is unreachable); per-link failures are skipped.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<String> {
        let top_k = top_k.max(1);
        let url = self.search_url(query)?;
        info!(target: "web.search", %query, top_k, url = %url, "search.start");

        let mut session = self.browser.open().await?;
        let outcome = self.run(session.as_mut(), url.as_str(), top_k).await;
        if let Err(error) = session.close().await {
            warn!(target: "web.search", %error, "failed to close browser session");
        }
        outcome
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.docs.search_page)
            .map_err(|e| QuarryError::Config(format!("bad search page url: {e}")))?;
        url.query_pairs_mut().append_pair("q", query);
        Ok(url)
    }

    async fn run(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        top_k: usize,
    ) -> Result<String> {
        let page = session.open(url).await?;
        let gathered = self.gather(page.as_ref()).await;
        if let Err(error) = page.close().await {
            warn!(target: "web.search", %error, "failed to close search page");
        }

        match gathered? {
            Gathered::Container { links } => {
                if links.is_empty() {
                    info!(target: "web.search", "container held no links");
                    return Ok(NO_CONTENT.to_string());
                }
                let results = extract_content(session, &links, top_k, ExtractMode::Scoped).await;
                Ok(join_or(results, NO_CONTENT.to_string()))
            }
            Gathered::Fallback { links } => {
                if links.is_empty() {
                    info!(target: "web.search", "no relevant links on the page");
                    return Ok(NO_RESULTS.to_string());
                }
                let found = links.len();
                let results = extract_content(session, &links, top_k, ExtractMode::FullPage).await;
                Ok(join_or(
                    results,
                    format!("Found {found} potential results but could not fetch content."),
                ))
            }
        }
    }

    async fn gather(&self, page: &dyn BrowserPage) -> Result<Gathered> {
        let site = &self.config.docs;
        match locate(page).await? {
            Some(found) => {
                let html = page.inner_html(&found.selector).await?.unwrap_or_default();
                let links = container_links(&html, site);
                let preview = &links[..links.len().min(3)];
                info!(
                    target: "web.search",
                    selector = %found.selector,
                    link_count = links.len(),
                    ?preview,
                    "container links collected"
                );
                Ok(Gathered::Container { links })
            }
            None => {
                let html = page.html().await?;
                let links = relevant_links(&html, site);
                info!(
                    target: "web.search",
                    link_count = links.len(),
                    "no container; scanned whole page for links"
                );
                Ok(Gathered::Fallback { links })
            }
        }
    }
}

fn join_or(results: Vec<ExtractedResult>, otherwise: String) -> String {
    if results.is_empty() {
        otherwise
    } else {
        results
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(RESULT_SEPARATOR)
    }
}
