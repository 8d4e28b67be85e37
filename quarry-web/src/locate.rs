//! Locating the search-results container.
//!
//! Docs themes have shipped several variants of the results markup over
//! time, so the locator is a data table rather than control flow: an
//! ordered list of `(selector, timeout)` attempts evaluated by a
//! first-success-wins combinator. Absence everywhere is an expected
//! outcome that selects the orchestrator's fallback branch, not an error.

use std::time::Duration;

use anyhow::Result;
use quarry_drivers::quarry_browser::{BrowserPage, Selector};
use tracing::info;

/// One candidate locator plus how long to wait for it.
#[derive(Debug, Clone, Copy)]
pub struct LocatorAttempt {
    pub selector: Selector,
    pub timeout: Duration,
}

const PRIMARY_WAIT: Duration = Duration::from_secs(10);
const FALLBACK_WAIT: Duration = Duration::from_secs(5);

/// Candidate locators for the results container, in priority order: the
/// structural lookup first, then historical id/class variants and heuristic
/// substring matches.
pub const CONTAINER_LOCATORS: &[LocatorAttempt] = &[
    LocatorAttempt {
        selector: Selector::XPath("//*[@id='search-results']"),
        timeout: PRIMARY_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css("#search-results"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css("#search_results"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css(".search_results"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css("[class*='search']"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css("[id*='search']"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css(".search-summary"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css(".search-result"),
        timeout: FALLBACK_WAIT,
    },
    LocatorAttempt {
        selector: Selector::Css("ul.search"),
        timeout: FALLBACK_WAIT,
    },
];

/// The container the locator settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerMatch {
    pub selector: Selector,
}

/// Find the results container on a loaded search page, if any.
pub async fn locate(page: &dyn BrowserPage) -> Result<Option<ContainerMatch>> {
    first_match(page, CONTAINER_LOCATORS).await
}

/// Evaluate attempts in order; the first present element wins.
pub async fn first_match(
    page: &dyn BrowserPage,
    attempts: &[LocatorAttempt],
) -> Result<Option<ContainerMatch>> {
    for attempt in attempts {
        if page.wait_for(&attempt.selector, attempt.timeout).await? {
            info!(
                target: "web.search",
                selector = %attempt.selector,
                "found results container"
            );
            return Ok(Some(ContainerMatch {
                selector: attempt.selector,
            }));
        }
    }
    Ok(None)
}
