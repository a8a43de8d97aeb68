//! Local category and gender detection.
//!
//! Used when the remote classifier is unreachable or answers with a tag
//! outside the known set.

use greenchoice_protocols::{Category, Classification, Gender, Listing};

use crate::tables::{
    CATEGORY_RULES, FEMALE_SIGNALS, FEMALE_WORDS, MALE_SIGNALS, MALE_WORDS,
    WOMEN_ETHNIC_PRIORITY,
};
use crate::text::{contains_any, has_token, tokenize};

/// First category in table order whose keywords appear in `tokens`.
fn first_matching_category(tokens: &[String]) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| contains_any(tokens, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Unknown)
}

fn gender_of(tokens: &[String]) -> Gender {
    if FEMALE_WORDS.iter().any(|w| has_token(tokens, w)) {
        Gender::Female
    } else if MALE_WORDS.iter().any(|w| has_token(tokens, w)) {
        Gender::Male
    } else {
        Gender::Unisex
    }
}

/// Detect category and gender from a title and breadcrumb.
///
/// Women's ethnic wear is checked first and forces `women_ethnic`/`female`.
/// Otherwise the category table is scanned in order and the first match wins.
pub fn detect_category_and_gender(title: &str, breadcrumb: &str) -> Classification {
    let tokens = tokenize(&format!("{title} {breadcrumb}"));
    if tokens.is_empty() {
        return Classification::unknown();
    }

    if contains_any(&tokens, WOMEN_ETHNIC_PRIORITY) {
        return Classification::new(Category::WomenEthnic, Gender::Female);
    }

    match first_matching_category(&tokens) {
        Category::Unknown => Classification::unknown(),
        category => Classification::new(category, gender_of(&tokens)),
    }
}

/// Category from the breadcrumb alone. Last resort of the fallback chain.
pub fn detect_category_from_breadcrumb(breadcrumb: &str) -> Category {
    first_matching_category(&tokenize(breadcrumb))
}

/// Gender named in free text. Female words are checked first.
pub fn guess_gender(text: &str) -> Gender {
    gender_of(&tokenize(text))
}

/// Whether a candidate is compatible with `gender`.
///
/// Only a candidate that signals the opposite gender, and not the requested
/// one, is rejected. Unlabelled candidates pass.
pub fn is_gender_match<L: Listing>(candidate: &L, gender: Gender) -> bool {
    let tokens = tokenize(&format!("{} {}", candidate.title(), candidate.url()));
    let female = FEMALE_SIGNALS.iter().any(|w| has_token(&tokens, w));
    let male = MALE_SIGNALS.iter().any(|w| has_token(&tokens, w));

    match gender {
        Gender::Female => !(male && !female),
        Gender::Male => !(female && !male),
        Gender::Unisex => true,
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
