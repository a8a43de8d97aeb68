//! Chrome DevTools Protocol tab driver for GreenChoice.
//!
//! Search pages are opened as background targets in a Chrome instance
//! running with remote debugging. The page-side collector is expected at
//! `window.__greenchoice` and is injected from a script file when missing.

pub mod cdp;
mod browser;
mod driver;

pub use browser::{find_chrome, Browser};
pub use driver::CdpTabDriver;
