//! Documentation search and retrieval.
//!
//! - Result locator with an ordered selector fallback policy (`locate`)
//! - Link extraction and URL normalization (`links`)
//! - Per-link content extraction (`content`)
//! - The [`search::SearchTool`] orchestrator (`search`)
//!
//! The flow is two-branched: when the search page exposes a recognizable
//! results container, links are pulled from inside it and each target is
//! read through a content-bearing element; when it does not, the whole page
//! is scanned for plausible documentation links and each target's full text
//! is used. Both branches end in one joined text blob or a fixed sentinel
//! message.

pub mod content;
pub mod links;
pub mod locate;
pub mod search;
