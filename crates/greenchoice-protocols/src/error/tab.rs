//! Browser tab errors.

use thiserror::Error;

/// Message fragments browsers use when no page-side collector is listening.
const CONNECTION_ERROR_MARKERS: [&str; 3] = [
    "Receiving end does not exist",
    "Could not establish connection",
    "The message port closed",
];

#[derive(Debug, Error)]
pub enum TabError {
    #[error("Failed to open tab: {0}")]
    OpenFailed(String),

    /// The request could not reach a collector in the tab.
    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Collector injection failed: {0}")]
    InjectionFailed(String),

    #[error("Tab not found: {0}")]
    TabNotFound(u64),

    #[error("Timeout after {0} ms")]
    Timeout(u64),

    #[error("Driver error: {0}")]
    Driver(String),
}

impl TabError {
    /// Whether injecting the collector and retrying may fix this error.
    pub fn is_communication(&self) -> bool {
        match self {
            TabError::Communication(_) => true,
            TabError::Driver(msg) => is_connection_message(msg),
            _ => false,
        }
    }
}

/// Recognize a "nobody is listening" failure by its message text.
pub fn is_connection_message(msg: &str) -> bool {
    CONNECTION_ERROR_MARKERS.iter().any(|m| msg.contains(m))
}
