//! `TabDriver` over CDP page targets.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, warn};

use greenchoice_protocols::{
    CollectorRequest, TabDriver, TabError, TabId, TabStatus, TabStatusStream,
};

use crate::cdp::{CdpClient, CdpError, PageSession};

/// Key of the object the collector wrapper returns when no collector is
/// installed in the page.
const MISSING_MARKER: &str = "__greenchoiceMissing";

/// Error text reported when the page has no collector.
const NO_COLLECTOR: &str = "Receiving end does not exist";

const READY_STATE_EXPRESSION: &str =
    r#"document.location.href === "about:blank" ? "loading" : document.readyState"#;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Expression that hands `request` to the page collector.
fn collector_call_expression(request: &CollectorRequest) -> Result<String, TabError> {
    let payload = serde_json::to_string(request).map_err(|e| TabError::Driver(e.to_string()))?;
    Ok(format!(
        r#"(async () => {{
  const collector = window.__greenchoice;
  if (!collector || typeof collector.handle !== "function") {{
    return {{ {MISSING_MARKER}: true }};
  }}
  return await collector.handle({payload});
}})()"#
    ))
}

fn is_missing_collector(value: &Value) -> bool {
    value.get(MISSING_MARKER).and_then(Value::as_bool) == Some(true)
}

fn ready_state_status(state: Option<&str>) -> TabStatus {
    match state {
        Some("complete") => TabStatus::Complete,
        _ => TabStatus::Loading,
    }
}

/// Drives hidden search tabs in a Chrome instance.
pub struct CdpTabDriver {
    client: Arc<CdpClient>,
    collector_script: Option<PathBuf>,
    poll_interval: Duration,
    next_id: AtomicU64,
    tabs: Mutex<HashMap<TabId, Arc<PageSession>>>,
}

impl CdpTabDriver {
    pub fn new(client: Arc<CdpClient>, collector_script: Option<PathBuf>) -> Self {
        Self {
            client,
            collector_script,
            poll_interval: DEFAULT_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
            tabs: Mutex::new(HashMap::new()),
        }
    }

    /// How often `document.readyState` is polled for status changes.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn open_tab_count(&self) -> usize {
        self.tabs.lock().len()
    }

    fn session(&self, tab: TabId) -> Result<Arc<PageSession>, TabError> {
        self.tabs
            .lock()
            .get(&tab)
            .cloned()
            .ok_or(TabError::TabNotFound(tab.0))
    }
}

#[async_trait]
impl TabDriver for CdpTabDriver {
    async fn open_hidden_tab(&self, url: &str) -> Result<TabId, TabError> {
        let target_id = self
            .client
            .create_background_target(url)
            .await
            .map_err(|e| TabError::OpenFailed(e.to_string()))?;

        let session = match self.client.attach(&target_id).await {
            Ok(session) => session,
            Err(e) => {
                if let Err(close_err) = self.client.close_target(&target_id).await {
                    warn!("Failed to close unattached target {}: {}", target_id, close_err);
                }
                return Err(TabError::OpenFailed(e.to_string()));
            }
        };

        let tab = TabId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tabs.lock().insert(tab, Arc::new(session));
        debug!("Opened {} ({}) at {}", tab, target_id, url);
        Ok(tab)
    }

    async fn close_tab(&self, tab: TabId) -> Result<(), TabError> {
        let Some(session) = self.tabs.lock().remove(&tab) else {
            return Ok(());
        };
        self.client
            .close_target(session.target_id())
            .await
            .map_err(TabError::from)?;
        debug!("Closed {}", tab);
        Ok(())
    }

    async fn send_to_tab(&self, tab: TabId, request: &CollectorRequest) -> Result<Value, TabError> {
        let session = self.session(tab)?;
        let expression = collector_call_expression(request)?;

        let value = session.evaluate(&expression).await.map_err(TabError::from)?;
        if is_missing_collector(&value) {
            return Err(TabError::Communication(NO_COLLECTOR.to_string()));
        }
        Ok(value)
    }

    async fn inject_collector(&self, tab: TabId) -> Result<(), TabError> {
        let session = self.session(tab)?;
        let path = self
            .collector_script
            .as_ref()
            .ok_or_else(|| TabError::InjectionFailed("no collector script configured".to_string()))?;

        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TabError::InjectionFailed(format!("{}: {}", path.display(), e)))?;

        session
            .evaluate(&source)
            .await
            .map_err(|e| TabError::InjectionFailed(e.to_string()))?;
        debug!("Injected collector into {}", tab);
        Ok(())
    }

    async fn status_changes(&self, tab: TabId) -> Result<TabStatusStream, TabError> {
        let session = self.session(tab)?;
        let interval = self.poll_interval;

        // Emits on change only; ends once the page stops answering.
        let changes = stream::unfold((session, None), move |(session, last)| async move {
            loop {
                let state = match session.evaluate(READY_STATE_EXPRESSION).await {
                    Ok(value) => ready_state_status(value.as_str()),
                    Err(CdpError::JavaScript(_)) => TabStatus::Loading,
                    Err(e) => {
                        debug!("Status polling for {} ended: {}", session.target_id(), e);
                        return None;
                    }
                };
                if last != Some(state) {
                    return Some((state, (session, Some(state))));
                }
                tokio::time::sleep(interval).await;
            }
        });

        Ok(Box::pin(changes))
    }
}
