//! Tab messaging with collector injection.

use std::time::Duration;

use greenchoice_protocols::{CollectorRequest, TabDriver, TabError, TabId};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Retry policy for [`send_message_safe`].
#[derive(Debug, Clone)]
pub struct SafeSendPolicy {
    /// Inject-and-retry rounds after the first attempt.
    pub retries: u32,
    /// Wait between injection and the retried send.
    pub delay: Duration,
}

impl Default for SafeSendPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            delay: Duration::from_millis(250),
        }
    }
}

/// Send `request` to a tab, injecting the collector when nobody answers.
///
/// Only communication errors trigger injection. Any other error, or an
/// injection failure, is returned unchanged.
pub async fn send_message_safe(
    driver: &dyn TabDriver,
    tab: TabId,
    request: &CollectorRequest,
    policy: &SafeSendPolicy,
) -> Result<Value, TabError> {
    let mut attempt = 0;
    loop {
        match driver.send_to_tab(tab, request).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_communication() && attempt < policy.retries => {
                debug!("No collector in {} for '{}': {}, injecting", tab, request.action, e);
                if let Err(inject_err) = driver.inject_collector(tab).await {
                    warn!("Collector injection into {} failed: {}", tab, inject_err);
                    return Err(inject_err);
                }
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
