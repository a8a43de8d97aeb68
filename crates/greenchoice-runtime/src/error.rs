//! Runtime errors.

use greenchoice_protocols::{ScoringError, TabError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Tab error: {0}")]
    Tab(#[from] TabError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Page not supported: {0}")]
    UnsupportedPage(String),

    #[error("No scored products: {0}")]
    NothingScored(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tab_error() {
        let err = RuntimeError::from(TabError::TabNotFound(3));
        assert!(matches!(err, RuntimeError::Tab(_)));
        assert!(err.to_string().contains("Tab not found"));
    }

    #[test]
    fn test_from_scoring_error() {
        let err = RuntimeError::from(ScoringError::Network("refused".to_string()));
        assert!(err.to_string().contains("refused"));
    }

    #[test]
    fn test_unsupported_page_display() {
        let err = RuntimeError::UnsupportedPage("no product data".to_string());
        assert_eq!(err.to_string(), "Page not supported: no product data");
    }
}
