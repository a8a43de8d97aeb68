//! # GreenChoice Matching
//!
//! Pure, synchronous product matching used by the cross-site comparison:
//!
//! - [`text`] - tokenization, noise stripping, synonyms
//! - [`classifier`] - category and gender detection from titles and breadcrumbs
//! - [`query`] - search query construction for external sites
//! - [`relevance`] - category guard, gender filter and overlap ranking
//! - [`dedup`] / [`ranking`] - duplicate collapsing and final ordering
//!
//! All keyword tables live in [`tables`] and are read-only.

pub mod classifier;
pub mod dedup;
pub mod query;
pub mod ranking;
pub mod relevance;
pub mod tables;
pub mod text;

pub use classifier::{
    detect_category_and_gender, detect_category_from_breadcrumb, guess_gender, is_gender_match,
};
pub use dedup::{dedupe_scored_keep_best, dedupe_scraped_products};
pub use query::{build_clean_query, make_smart_query};
pub use ranking::{filter_more_sustainable, rank_best};
pub use relevance::{
    filter_by_category_and_gender, filter_relevant_products, relevance_score, RelevanceOptions,
};
pub use text::{normalize_query, tokenize};
