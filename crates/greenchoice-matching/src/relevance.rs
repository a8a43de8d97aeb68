//! Relevance filtering of scraped candidates against a base product.
//!
//! Two stages run per site: [`filter_by_category_and_gender`] drops
//! candidates from the wrong category or gender, then
//! [`filter_relevant_products`] ranks what is left by token overlap with the
//! base query.

use greenchoice_protocols::{Category, Gender, Listing};
use tracing::debug;

use crate::classifier::is_gender_match;
use crate::tables::{category_keywords, CONFLICT_RULES, MUST_HAVE, WOMEN_ETHNIC_GARMENTS};
use crate::text::{contains_any, has_token, normalize_query, synonyms, tokenize};

/// Most candidates kept per site.
pub const MAX_RELEVANT: usize = 12;

/// Query tokens shorter than this never count as hits.
const MIN_TOKEN_LEN: usize = 2;

/// Short queries need a single hit, longer ones two.
const SHORT_QUERY_TOKENS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelevanceOptions {
    /// Return nothing rather than fall back to weakly relevant candidates.
    pub strict: bool,
}

impl RelevanceOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

/// Number of query tokens found in `title`, directly or through a synonym.
pub fn relevance_score(query_tokens: &[String], title: &str) -> usize {
    let title_tokens = tokenize(title);
    query_tokens
        .iter()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .filter(|t| has_token(&title_tokens, t) || synonyms(t).any(|s| has_token(&title_tokens, s)))
        .count()
}

/// Whether a candidate hits a conflict rule for this base title.
fn conflicts(base_tokens: &[String], candidate_tokens: &[String]) -> bool {
    CONFLICT_RULES.iter().any(|(bases, rejected)| {
        bases.iter().any(|b| has_token(base_tokens, b))
            && rejected.iter().any(|r| has_token(candidate_tokens, r))
    })
}

/// Rank candidates by relevance to `base_title`.
///
/// When the base title names a category-defining word, candidates must name
/// it too. Conflicting candidates (a shirt for a hoodie base) are always
/// dropped. In strict mode an unmet guard or threshold yields an empty list;
/// otherwise the filter falls back to the best available candidates. At most
/// [`MAX_RELEVANT`] candidates are returned, best first.
pub fn filter_relevant_products<P>(products: &[P], base_title: &str, options: RelevanceOptions) -> Vec<P>
where
    P: Listing + Clone,
{
    if products.is_empty() {
        return Vec::new();
    }

    let base_tokens = tokenize(base_title);
    let must_have = MUST_HAVE.iter().copied().find(|w| has_token(&base_tokens, w));

    let mut pool: Vec<&P> = products.iter().collect();
    if let Some(word) = must_have {
        pool.retain(|p| !conflicts(&base_tokens, &tokenize(p.title())));

        let guarded: Vec<&P> = pool
            .iter()
            .copied()
            .filter(|p| has_token(&tokenize(p.title()), word))
            .collect();

        if !guarded.is_empty() {
            pool = guarded;
        } else if options.strict {
            debug!(must_have = word, "No candidate passed the category guard");
            return Vec::new();
        } else {
            debug!(must_have = word, "Category guard unmet, falling back to unguarded pool");
        }
    }

    let query_tokens = tokenize(&normalize_query(base_title));
    if query_tokens.is_empty() {
        if options.strict {
            return Vec::new();
        }
        return pool.into_iter().take(MAX_RELEVANT).cloned().collect();
    }

    let mut min_hits = if query_tokens.len() <= SHORT_QUERY_TOKENS { 1 } else { 2 };
    if must_have.is_some() {
        min_hits = min_hits.max(2);
    }

    let mut ranked: Vec<(usize, &P)> = pool
        .into_iter()
        .map(|p| (relevance_score(&query_tokens, p.title()), p))
        .collect();
    // Stable: equal scores keep scrape order.
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let passing = ranked.iter().filter(|(score, _)| *score >= min_hits).count();
    if passing == 0 {
        if options.strict {
            return Vec::new();
        }
    } else {
        ranked.truncate(passing);
    }

    ranked
        .into_iter()
        .take(MAX_RELEVANT)
        .map(|(_, p)| p.clone())
        .collect()
}

/// Keep candidates from `category` that suit `gender`.
///
/// An `Unknown` category keeps every candidate. Gender filtering applies to
/// apparel, or to everything when the category has no keywords; if it removes
/// every candidate the result is empty.
pub fn filter_by_category_and_gender<P>(products: &[P], category: Category, gender: Gender) -> Vec<P>
where
    P: Listing + Clone,
{
    let keywords = category_keywords(category);

    let mut kept: Vec<P> = products
        .iter()
        .filter(|p| {
            if keywords.is_empty() {
                return true;
            }
            let tokens = tokenize(p.title());
            contains_any(&tokens, keywords)
                && (category != Category::WomenEthnic || contains_any(&tokens, WOMEN_ETHNIC_GARMENTS))
        })
        .cloned()
        .collect();

    if gender != Gender::Unisex && (category.is_apparel() || keywords.is_empty()) {
        kept.retain(|p| is_gender_match(p, gender));
    }

    kept
}

#[cfg(test)]
#[path = "relevance_tests.rs"]
mod tests;
