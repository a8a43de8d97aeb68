//! Minimal CDP client.
//!
//! Connects to Chrome over the browser WebSocket and multiplexes page
//! sessions over it (flattened `Target.attachToTarget` sessions).

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
