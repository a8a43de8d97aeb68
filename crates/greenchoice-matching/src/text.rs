//! Tokenization and query normalization.

use std::collections::HashSet;

use crate::tables::{MUST_KEEP, QUERY_NOISE, SYNONYM_GROUPS};

/// Tokens kept from the front of a title before must-keep words are appended.
const QUERY_HEAD_TOKENS: usize = 8;

/// Hard cap on normalized query length, in tokens.
const QUERY_MAX_TOKENS: usize = 12;

/// Lowercase, replace every character outside `a-z0-9` with a space, split
/// on whitespace and drop empty pieces.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Model codes such as `nuc11`.
fn is_model_number(token: &str) -> bool {
    token
        .strip_prefix("nuc")
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}

fn is_noise(token: &str) -> bool {
    QUERY_NOISE.contains(&token) || is_model_number(token)
}

/// Reduce a product title to a short search query.
///
/// Noise words and model numbers are dropped and the first eight unique
/// tokens kept. Category words from the title are re-appended if they fell
/// off, up to twelve tokens in total.
pub fn normalize_query(title: &str) -> String {
    let tokens: Vec<String> = tokenize(title)
        .into_iter()
        .filter(|t| !is_noise(t))
        .collect();

    let mut seen = HashSet::new();
    let mut out: Vec<&str> = tokens
        .iter()
        .filter(|t| seen.insert(t.as_str()))
        .take(QUERY_HEAD_TOKENS)
        .map(String::as_str)
        .collect();

    for keep in MUST_KEEP {
        if tokens.iter().any(|t| t == keep) && !out.contains(keep) {
            out.push(*keep);
        }
    }

    out.truncate(QUERY_MAX_TOKENS);
    out.join(" ")
}

/// Other members of `word`'s synonym group.
pub fn synonyms(word: &str) -> impl Iterator<Item = &'static str> + '_ {
    SYNONYM_GROUPS
        .iter()
        .filter(move |group| group.contains(&word))
        .flat_map(|group| group.iter().copied())
        .filter(move |w| *w != word)
}

/// A token equals `word` or is its plain plural (`s` / `es`).
pub(crate) fn token_matches(token: &str, word: &str) -> bool {
    match token.strip_prefix(word) {
        Some(rest) => rest.is_empty() || rest == "s" || rest == "es",
        None => false,
    }
}

/// Whether `tokens` contain `keyword`.
///
/// Single-word keywords match a whole token, plurals included. Multi-word or
/// hyphenated keywords match as consecutive tokens.
pub(crate) fn contains_keyword(tokens: &[String], keyword: &str) -> bool {
    let parts = tokenize(keyword);
    match parts.as_slice() {
        [] => false,
        [single] => tokens.iter().any(|t| token_matches(t, single)),
        [head @ .., last] => tokens.windows(parts.len()).any(|window| {
            window[..head.len()].iter().zip(head).all(|(t, w)| t == w)
                && token_matches(&window[head.len()], last)
        }),
    }
}

/// Whether `tokens` contain any of `keywords`.
pub(crate) fn contains_any(tokens: &[String], keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_keyword(tokens, k))
}

/// Exact-token membership, no plural folding.
pub(crate) fn has_token(tokens: &[String], word: &str) -> bool {
    tokens.iter().any(|t| t == word)
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
