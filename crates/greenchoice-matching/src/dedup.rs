//! Duplicate collapsing.

use std::collections::{HashMap, HashSet};

use greenchoice_protocols::{canonical_url, Listing, ScoredProduct};

/// Drop repeated listings, keeping the first occurrence of each dedup key.
///
/// Listings with neither a URL nor a title have no key and are dropped.
/// Applying this twice gives the same result as applying it once.
pub fn dedupe_scraped_products<P: Listing>(products: Vec<P>) -> Vec<P> {
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(|p| {
            let key = p.dedup_key();
            !key.is_empty() && seen.insert(key)
        })
        .collect()
}

/// Key for scored results. Without a URL the title is qualified by site so
/// same-named products from different sites stay apart. Empty when the
/// product has neither.
fn scored_key(product: &ScoredProduct) -> String {
    let url_key = canonical_url(product.url());
    if !url_key.is_empty() {
        return url_key;
    }
    let title = product.title().trim().to_lowercase();
    if title.is_empty() {
        String::new()
    } else {
        format!("{}::{}", product.site(), title)
    }
}

/// Collapse scored duplicates, keeping the highest score per key.
///
/// Entries with no key are dropped. Output order follows the first
/// appearance of each key.
pub fn dedupe_scored_keep_best(products: Vec<ScoredProduct>) -> Vec<ScoredProduct> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<ScoredProduct> = Vec::with_capacity(products.len());

    for product in products {
        let key = scored_key(&product);
        if key.is_empty() {
            continue;
        }
        match index.get(&key) {
            Some(&i) => {
                if product.numeric_score() > out[i].numeric_score() {
                    out[i] = product;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(product);
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
