//! # GreenChoice Protocols
//!
//! Shared data model and protocol definitions (traits) for GreenChoice.
//! Contains only types and interfaces - no I/O implementations.
//!
//! ## Core Traits
//!
//! - [`TabDriver`] - Browser tab lifecycle and page messaging
//! - [`ScoringService`] - Remote sustainability scoring and classification

pub mod category;
pub mod error;
pub mod product;
pub mod scoring;
pub mod site;
pub mod tab;

pub use category::{Category, Classification, Gender};
pub use error::{is_connection_message, ScoringError, TabError};
pub use product::{
    canonical_url, Listing, NormalizedProduct, ProductDescriptor, RawProduct, ScoredProduct,
};
pub use scoring::{ClassifyRequest, ClassifyResponse, ScoreRequestItem, ScoredItem, ScoringService};
pub use site::{CollectorRequest, QueryStyle, SiteScrape, SiteTarget, ACTION_ALTERNATIVES, ACTION_PRODUCT_DATA};
pub use tab::{TabDriver, TabId, TabStatus, TabStatusStream};
