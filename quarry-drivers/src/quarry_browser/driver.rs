use crate::quarry_browser::page::{IdlePolicy, QuarrySession};
use crate::quarry_browser::{Browser, BrowserSession};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::ClientBuilder;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use webdriver::capabilities::Capabilities;

use quarry_common::BrowserConfig;

/// Fantoccini-backed [`Browser`] connecting to a running WebDriver service
/// (Chromedriver by default; see [`BrowserConfig::webdriver_url`]).
pub struct QuarryDriver {
    config: BrowserConfig,
}

impl QuarryDriver {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

/// Chrome command-line arguments for a scraping session.
fn build_browser_arguments(headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--disable-extensions".to_string(),
        "--disable-background-networking".to_string(),
    ];
    if headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args
}

#[async_trait]
impl Browser for QuarryDriver {
    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert(
            "args".to_string(),
            json!(build_browser_arguments(self.config.headless)),
        );
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&self.config.webdriver_url)
            .await
            .with_context(|| {
                format!(
                    "failed to connect to webdriver at {}",
                    self.config.webdriver_url
                )
            })?;
        let home = client.window().await?;

        tracing::debug!(
            target: "browser.driver",
            webdriver_url = %self.config.webdriver_url,
            headless = self.config.headless,
            "browser session opened"
        );

        Ok(Box::new(QuarrySession::new(
            client,
            home,
            Duration::from_secs(self.config.page_load_timeout_secs),
            IdlePolicy::from(&self.config),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_arguments_include_gpu_knobs() {
        let args = build_browser_arguments(true);
        assert!(args.iter().any(|a| a == "--headless=new"));
        assert!(args.iter().any(|a| a == "--disable-gpu"));
    }

    #[test]
    fn headful_arguments_leave_the_window_visible() {
        let args = build_browser_arguments(false);
        assert!(!args.iter().any(|a| a.starts_with("--headless")));
    }
}
