use crate::quarry_browser::{BrowserPage, BrowserSession, Selector};
use anyhow::Result;
use async_trait::async_trait;
use fantoccini::wd::WindowHandle;
use fantoccini::{Client, Locator};
use std::time::{Duration, Instant};
use tokio::time::sleep;

use quarry_common::{BrowserConfig, QuarryError};

/// Tuning for the network-idle heuristic: the page counts as idle once the
/// document is complete and the resource-entry count has not moved for
/// `quiescence`. Reaching `timeout` first is not an error.
#[derive(Debug, Clone)]
pub struct IdlePolicy {
    pub quiescence: Duration,
    pub timeout: Duration,
    pub poll: Duration,
}

impl From<&BrowserConfig> for IdlePolicy {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            quiescence: Duration::from_millis(config.network_idle_window_ms),
            timeout: Duration::from_secs(config.network_idle_timeout_secs),
            poll: Duration::from_millis(250),
        }
    }
}

/// One WebDriver session. Each page lives in its own window so that closing
/// a page cannot disturb the rest of the session.
pub struct QuarrySession {
    client: Client,
    home: WindowHandle,
    nav_timeout: Duration,
    idle: IdlePolicy,
}

impl QuarrySession {
    pub fn new(client: Client, home: WindowHandle, nav_timeout: Duration, idle: IdlePolicy) -> Self {
        Self {
            client,
            home,
            nav_timeout,
            idle,
        }
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        match tokio::time::timeout(self.nav_timeout, self.client.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(QuarryError::Navigation(format!("{url}: {e}")).into()),
            Err(_) => Err(QuarryError::Navigation(format!(
                "{url}: timed out after {}s",
                self.nav_timeout.as_secs()
            ))
            .into()),
        }
    }
}

#[async_trait]
impl BrowserSession for QuarrySession {
    async fn open(&mut self, url: &str) -> Result<Box<dyn BrowserPage>> {
        let created = self.client.new_window(true).await?;
        self.client.switch_to_window(created.handle.clone()).await?;

        if let Err(error) = self.navigate(url).await {
            // Don't leave the failed window behind.
            let _ = self.client.close_window().await;
            let _ = self.client.switch_to_window(self.home.clone()).await;
            return Err(error);
        }
        wait_for_network_idle(&self.client, &self.idle).await;

        Ok(Box::new(QuarryPage {
            client: self.client.clone(),
            window: created.handle,
            home: self.home.clone(),
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

/// A page in its own window. Pages are used one at a time, so the window is
/// assumed focused while the page is alive.
pub struct QuarryPage {
    client: Client,
    window: WindowHandle,
    home: WindowHandle,
}

fn locator(selector: &Selector) -> Locator<'static> {
    match *selector {
        Selector::Css(s) => Locator::Css(s),
        Selector::XPath(s) => Locator::XPath(s),
    }
}

#[async_trait]
impl BrowserPage for QuarryPage {
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<bool> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(locator(selector))
            .await
        {
            Ok(_) => Ok(true),
            Err(error) => {
                tracing::debug!(
                    target: "browser.page",
                    selector = %selector,
                    %error,
                    "selector wait came up empty"
                );
                Ok(false)
            }
        }
    }

    async fn inner_html(&self, selector: &Selector) -> Result<Option<String>> {
        match self.client.find(locator(selector)).await {
            Ok(element) => Ok(Some(element.html(true).await?)),
            Err(_) => Ok(None),
        }
    }

    async fn first_text(&self, selectors: &[Selector]) -> Result<Option<String>> {
        for selector in selectors {
            if let Ok(element) = self.client.find(locator(selector)).await {
                return Ok(Some(element.text().await?));
            }
        }
        Ok(None)
    }

    async fn html(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let _ = self.client.switch_to_window(self.window.clone()).await;
        let closed = self.client.close_window().await;
        let switched = self.client.switch_to_window(self.home.clone()).await;
        closed?;
        switched?;
        Ok(())
    }
}

const IDLE_PROBE: &str =
    "return [document.readyState, window.performance.getEntriesByType('resource').length];";

/// Poll the page until network activity has settled, or until the policy's
/// timeout. Never fails: the idle signal is a quality heuristic, and a page
/// that stays busy is still worth reading.
async fn wait_for_network_idle(client: &Client, policy: &IdlePolicy) {
    let deadline = Instant::now() + policy.timeout;
    let mut last_count = -1i64;
    let mut stable_since = Instant::now();

    loop {
        match client.execute(IDLE_PROBE, vec![]).await {
            Ok(value) => {
                let state = value.get(0).and_then(|v| v.as_str()).unwrap_or("");
                let count = value.get(1).and_then(|v| v.as_i64()).unwrap_or(-1);
                let now = Instant::now();
                if count != last_count {
                    last_count = count;
                    stable_since = now;
                }
                if state == "complete" && now.duration_since(stable_since) >= policy.quiescence {
                    return;
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: "browser.idle",
                    %error,
                    "idle probe failed; continuing without idle signal"
                );
                return;
            }
        }

        if Instant::now() >= deadline {
            tracing::debug!(
                target: "browser.idle",
                timeout_ms = policy.timeout.as_millis() as u64,
                "network idle not reached before timeout; continuing"
            );
            return;
        }
        sleep(policy.poll).await;
    }
}
