//! Scoring backend wire types.

use greenchoice_protocols::{ScoreRequestItem, ScoredItem};
use serde::{Deserialize, Serialize};

/// Body of `POST /alternatives`.
#[derive(Debug, Serialize)]
pub struct AlternativesRequest<'a> {
    pub products: &'a [ScoreRequestItem],
}

/// Answer of `POST /alternatives`. A missing list means nothing was scored.
#[derive(Debug, Deserialize)]
pub struct AlternativesResponse {
    #[serde(default)]
    pub alternatives: Vec<ScoredItem>,
}
