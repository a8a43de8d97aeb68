//! Search query construction.

use greenchoice_protocols::{Category, Gender};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::tables::{
    CLEAN_QUERY_KEEP, CLEAN_QUERY_STOP, PHRASE_PRIORITY, QUERY_STOP_WORDS, TYPE_PRIORITY,
};
use crate::text::{has_token, normalize_query, tokenize};

/// Extra title words for home and kitchen goods, where the type word alone
/// is too broad.
const EXTRA_TOKENS_HOME: usize = 3;
const EXTRA_TOKENS_DEFAULT: usize = 2;

/// Extra title words must be at least this long.
const EXTRA_TOKEN_MIN_LEN: usize = 4;

/// Words the clean query falls back to when no whitelisted word is present.
const CLEAN_FALLBACK_WORDS: usize = 3;

static CLEAN_STOP_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    let alternatives: Vec<String> = CLEAN_QUERY_STOP
        .iter()
        .map(|phrase| regex::escape(phrase).replace(' ', r"\s+"))
        .collect();
    Regex::new(&format!(r"\b(?:{})\b", alternatives.join("|"))).ok()
});

fn category_default_type(category: Category, tokens: &[String]) -> Option<&'static str> {
    match category {
        Category::WomenEthnic => Some("kurti"),
        Category::Footwear => Some("shoes"),
        Category::HomeKitchen if has_token(tokens, "key") => Some("key holder"),
        _ => None,
    }
}

/// Build the category/gender aware query sent to most sites.
///
/// The query is the gender word, then the product type (a known phrase, a
/// priority type word or a category default), then a few distinctive title
/// words. Falls back to [`normalize_query`] when this yields almost nothing.
pub fn make_smart_query(title: &str, breadcrumb: &str, category: Category, gender: Gender) -> String {
    let title_lower = title.to_lowercase();
    let text = format!("{title_lower} {}", breadcrumb.to_lowercase());
    let tokens = tokenize(&text);
    let title_tokens = tokenize(&title_lower);

    let mut parts: Vec<&str> = Vec::new();
    if let Some(word) = gender.query_token() {
        parts.push(word);
    }

    let phrase = PHRASE_PRIORITY
        .iter()
        .find(|(pattern, _)| pattern.is_match(&text))
        .map(|(_, phrase)| *phrase);

    let product_type = phrase
        .or_else(|| TYPE_PRIORITY.iter().copied().find(|w| has_token(&tokens, w)))
        .or_else(|| category_default_type(category, &tokens));
    if let Some(product_type) = product_type {
        parts.push(product_type);
    }

    let limit = if category == Category::HomeKitchen {
        EXTRA_TOKENS_HOME
    } else {
        EXTRA_TOKENS_DEFAULT
    };

    let mut extras = 0;
    for token in &title_tokens {
        if extras == limit {
            break;
        }
        if token.len() < EXTRA_TOKEN_MIN_LEN || QUERY_STOP_WORDS.contains(&token.as_str()) {
            continue;
        }
        if parts.iter().any(|p| p.split(' ').any(|w| w == token)) {
            continue;
        }
        parts.push(token);
        extras += 1;
    }

    let query = parts.join(" ");
    if query.len() < 3 {
        normalize_query(title)
    } else {
        query
    }
}

/// Build the narrow query used by sites that punish noisy searches.
///
/// Marketing phrases are stripped and only whitelisted garment words kept.
/// Without any, the first three remaining words are used.
pub fn build_clean_query(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = match CLEAN_STOP_PATTERN.as_ref() {
        Some(pattern) => pattern.replace_all(&lower, " ").into_owned(),
        None => lower,
    };

    let tokens = tokenize(&stripped);
    let kept: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|t| CLEAN_QUERY_KEEP.contains(t))
        .collect();

    if !kept.is_empty() {
        return kept.join(" ");
    }

    stripped
        .split_whitespace()
        .take(CLEAN_FALLBACK_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
