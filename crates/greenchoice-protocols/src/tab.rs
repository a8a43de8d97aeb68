//! Browser tab lifecycle protocol.
//!
//! The comparison runtime never touches a browser directly. It drives tabs
//! through a [`TabDriver`], which may be backed by CDP, an extension bridge,
//! or an in-memory fake in tests.

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TabError;
use crate::site::CollectorRequest;

/// Opaque tab identifier handed out by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab_{}", self.0)
    }
}

/// Loading status reported for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

/// Stream of status changes for one tab. Dropping it unsubscribes.
pub type TabStatusStream = Pin<Box<dyn Stream<Item = TabStatus> + Send>>;

/// Core trait for tab lifecycle and page messaging.
#[async_trait]
pub trait TabDriver: Send + Sync {
    /// Open a background (non-focused) tab at `url`.
    async fn open_hidden_tab(&self, url: &str) -> Result<TabId, TabError>;

    /// Close a tab. Closing an already closed tab is not an error.
    async fn close_tab(&self, tab: TabId) -> Result<(), TabError>;

    /// Send a request to the tab's collector.
    ///
    /// Returns [`TabError::Communication`] when no collector is listening.
    async fn send_to_tab(&self, tab: TabId, request: &CollectorRequest)
        -> Result<Value, TabError>;

    /// Place the collector into a tab that does not have it yet.
    async fn inject_collector(&self, tab: TabId) -> Result<(), TabError>;

    /// Subscribe to status changes of a tab.
    async fn status_changes(&self, tab: TabId) -> Result<TabStatusStream, TabError>;
}
