//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_backend(config, &mut result);
        Self::validate_scrape(config, &mut result);
        Self::validate_comparison(config, &mut result);
        Self::validate_sites(config, &mut result);

        Ok(result)
    }

    fn validate_backend(config: &Config, result: &mut ValidationResult) {
        let url = &config.backend.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "backend.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if config.backend.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "backend.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_scrape(config: &Config, result: &mut ValidationResult) {
        let scrape = &config.scrape;

        for (path, value) in [
            ("scrape.hard_timeout_ms", scrape.hard_timeout_ms),
            ("scrape.slow_hard_timeout_ms", scrape.slow_hard_timeout_ms),
        ] {
            if value == 0 {
                result.add_error(ValidationError::new(path, "timeout must be greater than 0"));
            }
        }

        // A hydration delay at or past the hard timeout never reaches the send.
        if scrape.hydrate_delay_ms >= scrape.hard_timeout_ms {
            result.add_error(ValidationError::new(
                "scrape.hydrate_delay_ms",
                "hydrate_delay_ms must be shorter than hard_timeout_ms",
            ));
        }
        if scrape.slow_hydrate_delay_ms >= scrape.slow_hard_timeout_ms {
            result.add_error(ValidationError::new(
                "scrape.slow_hydrate_delay_ms",
                "slow_hydrate_delay_ms must be shorter than slow_hard_timeout_ms",
            ));
        }
    }

    fn validate_comparison(config: &Config, result: &mut ValidationResult) {
        if config.comparison.top_k == 0 {
            result.add_error(ValidationError::new(
                "comparison.top_k",
                "top_k must be greater than 0",
            ));
        }

        if config.comparison.per_site_limit == 0 {
            result.add_warning(ValidationWarning::new(
                "comparison.per_site_limit",
                "per_site_limit is 0, no candidates will be scored",
            ));
        }
    }

    fn validate_sites(config: &Config, result: &mut ValidationResult) {
        if config.sites.is_empty() {
            result.add_error(ValidationError::new("sites", "At least one site is required"));
            return;
        }

        let mut names = HashSet::new();
        for (i, site) in config.sites.iter().enumerate() {
            if site.name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("sites[{}].name", i),
                    "Site name cannot be empty",
                ));
            } else if !names.insert(site.name.to_lowercase()) {
                result.add_warning(ValidationWarning::new(
                    format!("sites[{}].name", i),
                    format!("Site '{}' is listed more than once", site.name),
                ));
            }

            if !site.search_url_template.contains("{query}") {
                result.add_error(ValidationError::new(
                    format!("sites[{}].search_url_template", i),
                    "search_url_template must contain {query}",
                ));
            }

            if site.scrape_action.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("sites[{}].scrape_action", i),
                    "scrape_action cannot be empty",
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
