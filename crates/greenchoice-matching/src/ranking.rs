//! Final ordering of scored products.

use greenchoice_protocols::ScoredProduct;

use crate::dedup::dedupe_scored_keep_best;

/// Deduplicate, sort by score descending and keep the best `top_k`.
///
/// Ties keep their input order.
pub fn rank_best(products: Vec<ScoredProduct>, top_k: usize) -> Vec<ScoredProduct> {
    let mut ranked = dedupe_scored_keep_best(products);
    ranked.sort_by(|a, b| b.numeric_score().total_cmp(&a.numeric_score()));
    ranked.truncate(top_k);
    ranked
}

/// Products strictly more sustainable than `base_score`.
pub fn filter_more_sustainable(products: &[ScoredProduct], base_score: f64) -> Vec<ScoredProduct> {
    products
        .iter()
        .filter(|p| p.numeric_score() > base_score)
        .cloned()
        .collect()
}
