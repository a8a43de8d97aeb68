//! CDP page session for a single tab.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use super::client::Transport;
use super::error::CdpError;

/// A session attached to a single page target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    transport: Arc<Transport>,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, transport: Arc<Transport>) -> Self {
        Self {
            target_id,
            session_id,
            transport,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.transport
            .call(method, params, Some(&self.session_id))
            .await
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;
        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Evaluate a JavaScript expression, awaiting a returned promise.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        exception_text(&result).map_or_else(
            || Ok(result["result"]["value"].clone()),
            |text| Err(CdpError::JavaScript(text)),
        )
    }
}

/// Error text of a `Runtime.evaluate` result that threw.
pub(crate) fn exception_text(result: &Value) -> Option<String> {
    let exception = result.get("exceptionDetails")?;
    let description = exception["exception"]["description"].as_str();
    let text = exception["text"].as_str();
    Some(
        description
            .or(text)
            .unwrap_or("Unknown error")
            .to_string(),
    )
}
