//! HTTP sustainability scoring backend for GreenChoice.

mod api;
mod service;

pub use service::HttpScoringService;
