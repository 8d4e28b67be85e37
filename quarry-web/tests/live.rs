//! End-to-end check against the live docs site through a real WebDriver.
//!
//! Run by hand with a Chromedriver on localhost:9515:
//! `cargo test -p quarry-web --test live -- --ignored`

mod common;

use std::sync::Arc;

use quarry_common::QuarryConfig;
use quarry_drivers::quarry_browser::QuarryDriver;
use quarry_web::search::{NO_CONTENT, NO_RESULTS, SearchTool};

#[tokio::test]
#[ignore] // Requires a running WebDriver and network access
async fn searches_the_live_docs_site() {
    common::init_test_tracing();

    let config = QuarryConfig::default();
    let driver = QuarryDriver::new(config.browser.clone());
    let tool = SearchTool::new(Arc::new(driver), config);

    let result = tool.search("dataframe filter", 1).await.expect("search");

    assert!(!result.is_empty());
    assert_ne!(result, NO_CONTENT);
    assert_ne!(result, NO_RESULTS);
    assert!(result.contains("DataFrame") || result.contains("filter"));
}
