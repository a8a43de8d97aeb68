//! Error types for the GreenChoice protocol layer.

mod scoring;
mod tab;

pub use scoring::*;
pub use tab::*;
