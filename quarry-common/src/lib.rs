//! Common types and utilities shared across Quarry crates.
//!
//! This crate defines configuration, observability helpers, and shared error
//! types used throughout the Quarry workspace. It is intentionally
//! lightweight and dependency-minimal so that all crates can depend on it
//! without introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`QuarryConfig`]: Top-level runtime configuration
//! - [`BrowserConfig`]: WebDriver endpoint and page-load tuning
//! - [`DocsSite`]: The documentation site being searched
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`QuarryError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! Constructing a default configuration:
//!
//! ```rust
//! use quarry_common::QuarryConfig;
//!
//! let cfg = QuarryConfig::default();
//! assert_eq!(cfg.browser.webdriver_url, "http://localhost:9515");
//! assert_eq!(cfg.docs.library, "polars");
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Configuration for Quarry operations.
///
/// This structure is passed to the search tool and the browser driver to
/// configure runtime behavior. All fields have workable defaults so the
/// tool runs against a local Chromedriver out of the box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuarryConfig {
    /// Browser automation settings.
    #[serde(default)]
    pub browser: BrowserConfig,
    /// The documentation site searched by the tool.
    #[serde(default)]
    pub docs: DocsSite,
}

/// WebDriver connection and page-load behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver endpoint to connect to (Chromedriver by default).
    pub webdriver_url: String,
    /// Whether to run the browser without a visible window.
    pub headless: bool,
    /// Hard bound on a single page navigation, in seconds.
    pub page_load_timeout_secs: u64,
    /// How long network activity must stay quiet before a page counts as
    /// idle, in milliseconds.
    pub network_idle_window_ms: u64,
    /// Overall bound on the network-idle wait, in seconds. Reaching it is
    /// not an error; the page is used as-is.
    pub network_idle_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            page_load_timeout_secs: 30,
            network_idle_window_ms: 500,
            network_idle_timeout_secs: 10,
        }
    }
}

/// The documentation site searched by the tool.
///
/// `host` absolutizes root-relative hrefs, `base_path` absolutizes bare
/// relative hrefs, and `search_page` receives the `q` query parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsSite {
    /// Scheme + host, no trailing slash.
    pub host: String,
    /// Base path joined in front of bare relative hrefs, with trailing slash.
    pub base_path: String,
    /// Full URL of the site's search page.
    pub search_page: String,
    /// Library name used to judge link relevance on the fallback path.
    pub library: String,
}

impl Default for DocsSite {
    fn default() -> Self {
        Self {
            host: "https://docs.pola.rs".to_string(),
            base_path: "https://docs.pola.rs/api/python/stable/".to_string(),
            search_page: "https://docs.pola.rs/api/python/stable/search.html".to_string(),
            library: "polars".to_string(),
        }
    }
}

/// Error types used across the Quarry system.
#[derive(thiserror::Error, Debug)]
pub enum QuarryError {
    /// A page failed to load or timed out.
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// An element was missing or its text was unexpectedly empty.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The WebDriver transport reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`QuarryError`].
pub type Result<T> = std::result::Result<T, QuarryError>;
