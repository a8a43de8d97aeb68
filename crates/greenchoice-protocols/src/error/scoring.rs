//! Scoring backend errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_error_api_error() {
        let err = ScoringError::ApiError {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[test]
    fn test_scoring_error_network() {
        let err = ScoringError::Network("Connection refused".to_string());
        assert!(err.to_string().contains("Network error"));
    }

    #[test]
    fn test_scoring_error_debug() {
        let err = ScoringError::InvalidResponse("missing alternatives".to_string());
        assert!(format!("{:?}", err).contains("InvalidResponse"));
    }
}
