//! # GreenChoice Runtime
//!
//! Drives browser tabs and the scoring backend:
//!
//! - [`messaging`] - tab messaging with collector injection on failure
//! - [`orchestrator`] - one hidden-tab scrape session per site
//! - [`driver`] - the cross-site comparison
//! - [`page`] - best sustainable choice among products on an open page

pub mod driver;
pub mod error;
pub mod messaging;
pub mod orchestrator;
pub mod page;

#[cfg(test)]
mod fakes;

pub use driver::{resolve_classification, ComparisonDriver, ComparisonOutcome, ComparisonSettings};
pub use error::RuntimeError;
pub use messaging::{send_message_safe, SafeSendPolicy};
pub use orchestrator::{wait_for_complete, ScrapeOrchestrator, ScrapeTiming};
pub use page::{best_on_page, PageBest};
