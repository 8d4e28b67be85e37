//! Browser seams and the WebDriver implementation behind them.
//!
//! The traits here form an explicit resource hierarchy: a [`Browser`] opens
//! [`BrowserSession`]s, a session opens [`BrowserPage`]s, and both sessions
//! and pages are closed exactly once via `close(self: Box<Self>)`. Callers
//! (and tests) program against the traits; production code uses the
//! fantoccini-backed types in [`driver`] and [`page`].

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

pub mod driver;
pub mod page;

pub use driver::QuarryDriver;

/// How to address an element on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector.
    Css(&'static str),
    /// XPath expression.
    XPath(&'static str),
}

impl Selector {
    /// The raw selector text.
    pub fn target(&self) -> &'static str {
        match *self {
            Selector::Css(s) | Selector::XPath(s) => s,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

/// Launches/connects browser sessions. One session per search invocation.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>>;
}

/// One live browser session. Pages are opened one at a time and must be
/// closed before the next is opened; the session itself must be closed
/// exactly once on every path.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a page on `url`: navigate with a bounded timeout, then wait for
    /// network-idle (best effort). A navigation failure leaves no page
    /// behind.
    async fn open(&mut self, url: &str) -> Result<Box<dyn BrowserPage>>;

    /// End the session, releasing the underlying browser.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// A loaded page. All reads are against the live DOM.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Wait up to `timeout` for `selector` to match. Absence (including a
    /// wait that errors out) is reported as `false`, not as an error.
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<bool>;

    /// Inner HTML of the first element matching `selector`, if any.
    async fn inner_html(&self, selector: &Selector) -> Result<Option<String>>;

    /// Visible text of the first element matching any of `selectors`, tried
    /// in order.
    async fn first_text(&self, selectors: &[Selector]) -> Result<Option<String>>;

    /// Full page source.
    async fn html(&self) -> Result<String>;

    /// Release the page.
    async fn close(self: Box<Self>) -> Result<()>;
}
