//! CDP error types.

use greenchoice_protocols::{is_connection_message, TabError};
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=9222")]
    ChromeNotAvailable(String),

    #[error("Chrome not found. Please install Google Chrome or Chromium.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error (endpoint discovery).
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

/// Milliseconds reported for a transport-level timeout.
const CALL_TIMEOUT_MS: u64 = 30_000;

impl From<CdpError> for TabError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Timeout(_) => TabError::Timeout(CALL_TIMEOUT_MS),
            CdpError::JavaScript(msg) if is_connection_message(&msg) => TabError::Communication(msg),
            // The page navigated or was torn down under us.
            CdpError::Protocol { message, .. } if message.contains("context") => {
                TabError::Communication(message)
            }
            other => TabError::Driver(other.to_string()),
        }
    }
}
