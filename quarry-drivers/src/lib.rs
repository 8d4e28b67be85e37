//! Driver layer for browser automation.
//!
//! This crate exposes the browser seams and the WebDriver-backed
//! implementation used to load and read documentation pages.
//!
//! - [`quarry_browser::Browser`], [`quarry_browser::BrowserSession`],
//!   [`quarry_browser::BrowserPage`]: the trait seams callers program against
//! - [`quarry_browser::driver::QuarryDriver`]: fantoccini-backed [`quarry_browser::Browser`]
//! - [`quarry_browser::page::QuarrySession`] / [`quarry_browser::page::QuarryPage`]:
//!   window-per-page lifecycle, bounded selector waits, network-idle heuristic
pub mod quarry_browser;
