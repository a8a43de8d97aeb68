//! Hidden-tab scrape sessions.
//!
//! Each session opens a background tab on a site's search page, waits for the
//! load event, lets client-side rendering settle, asks the page collector for
//! results and closes the tab. A hard timeout races the whole session; when
//! it fires the session future is dropped, so nothing after it can produce a
//! second result. The tab is closed exactly once on every path.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use greenchoice_config::ScrapeConfig;
use greenchoice_protocols::{
    CollectorRequest, RawProduct, SiteScrape, SiteTarget, TabDriver, TabError, TabId, TabStatus,
};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::messaging::{send_message_safe, SafeSendPolicy};

/// Delays and budgets for one scrape session.
#[derive(Debug, Clone)]
pub struct ScrapeTiming {
    pub hydrate_delay: Duration,
    pub slow_hydrate_delay: Duration,
    pub hard_timeout: Duration,
    pub slow_hard_timeout: Duration,
    pub inject_retry_delay: Duration,
    pub slow_empty_retry: Duration,
}

impl Default for ScrapeTiming {
    fn default() -> Self {
        Self::from(&ScrapeConfig::default())
    }
}

impl From<&ScrapeConfig> for ScrapeTiming {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            hydrate_delay: Duration::from_millis(config.hydrate_delay_ms),
            slow_hydrate_delay: Duration::from_millis(config.slow_hydrate_delay_ms),
            hard_timeout: Duration::from_millis(config.hard_timeout_ms),
            slow_hard_timeout: Duration::from_millis(config.slow_hard_timeout_ms),
            inject_retry_delay: Duration::from_millis(config.inject_retry_delay_ms),
            slow_empty_retry: Duration::from_millis(config.slow_empty_retry_ms),
        }
    }
}

impl ScrapeTiming {
    pub fn hydrate_delay_for(&self, site: &SiteTarget) -> Duration {
        if site.slow_render {
            self.slow_hydrate_delay
        } else {
            self.hydrate_delay
        }
    }

    pub fn hard_timeout_for(&self, site: &SiteTarget) -> Duration {
        if site.slow_render {
            self.slow_hard_timeout
        } else {
            self.hard_timeout
        }
    }
}

/// An open hidden tab owned by one scrape session.
///
/// [`close`](Self::close) is idempotent. If the session is dropped before it
/// was closed (the caller was cancelled), closing is handed to a background
/// task.
struct ScrapeSession {
    driver: Arc<dyn TabDriver>,
    tab: TabId,
    started_at: Instant,
    closed: bool,
}

impl ScrapeSession {
    async fn open(driver: Arc<dyn TabDriver>, url: &str) -> Result<Self, TabError> {
        let tab = driver.open_hidden_tab(url).await?;
        Ok(Self {
            driver,
            tab,
            started_at: Instant::now(),
            closed: false,
        })
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.driver.close_tab(self.tab).await {
            warn!("Failed to close {}: {}", self.tab, e);
        }
    }
}

impl Drop for ScrapeSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let driver = self.driver.clone();
        let tab = self.tab;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = driver.close_tab(tab).await {
                    warn!("Failed to close abandoned {}: {}", tab, e);
                }
            });
        }
    }
}

/// Runs hidden-tab scrape sessions, one at a time.
pub struct ScrapeOrchestrator {
    driver: Arc<dyn TabDriver>,
    timing: ScrapeTiming,
}

impl ScrapeOrchestrator {
    pub fn new(driver: Arc<dyn TabDriver>, timing: ScrapeTiming) -> Self {
        Self { driver, timing }
    }

    pub fn driver(&self) -> &Arc<dyn TabDriver> {
        &self.driver
    }

    pub fn timing(&self) -> &ScrapeTiming {
        &self.timing
    }

    /// Scrape one site's search results for `query`.
    ///
    /// Never fails: an unopenable tab, a silent collector or a timeout all
    /// yield an empty result for the site.
    pub async fn scrape_site(&self, site: &SiteTarget, query: &str) -> SiteScrape {
        let url = site.search_url(query);
        let budget = self.timing.hard_timeout_for(site);

        let mut session = match ScrapeSession::open(self.driver.clone(), &url).await {
            Ok(session) => session,
            Err(e) => {
                warn!("{}: could not open search tab: {}", site.name, e);
                return SiteScrape::empty(&site.name);
            }
        };
        debug!("{}: scraping {} in {}", site.name, url, session.tab);

        let outcome = timeout(budget, self.run_session(session.tab, site)).await;
        let elapsed = session.started_at.elapsed();
        session.close().await;

        match outcome {
            Ok(Ok(products)) => {
                info!("{}: {} products in {:?}", site.name, products.len(), elapsed);
                SiteScrape {
                    site: site.name.clone(),
                    products,
                }
            }
            Ok(Err(e)) => {
                warn!("{}: scrape failed: {}", site.name, e);
                SiteScrape::empty(&site.name)
            }
            Err(_) => {
                warn!("{}: scrape timed out after {:?}", site.name, budget);
                SiteScrape::empty(&site.name)
            }
        }
    }

    async fn run_session(&self, tab: TabId, site: &SiteTarget) -> Result<Vec<RawProduct>, TabError> {
        wait_for_complete(self.driver.as_ref(), tab).await?;
        sleep(self.timing.hydrate_delay_for(site)).await;

        let request = CollectorRequest::new(&site.scrape_action);
        let policy = SafeSendPolicy {
            retries: 1,
            delay: self.timing.inject_retry_delay,
        };

        let response = send_message_safe(self.driver.as_ref(), tab, &request, &policy).await?;
        if response.is_null() {
            return Ok(Vec::new());
        }

        let scrape = SiteScrape::from_response(&site.name, response);
        if !scrape.is_empty() || !site.slow_render {
            return Ok(scrape.products);
        }

        debug!("{}: empty grid, retrying after {:?}", site.name, self.timing.slow_empty_retry);
        sleep(self.timing.slow_empty_retry).await;
        match self.driver.send_to_tab(tab, &request).await {
            Ok(response) => Ok(SiteScrape::from_response(&site.name, response).products),
            Err(e) => {
                debug!("{}: late retry failed: {}", site.name, e);
                Ok(Vec::new())
            }
        }
    }
}

/// Wait for the first "complete" status of `tab`. The subscription is
/// dropped as soon as it is seen.
pub async fn wait_for_complete(driver: &dyn TabDriver, tab: TabId) -> Result<(), TabError> {
    let mut statuses = driver.status_changes(tab).await?;
    while let Some(status) = statuses.next().await {
        if status == TabStatus::Complete {
            return Ok(());
        }
    }
    Err(TabError::TabNotFound(tab.0))
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
