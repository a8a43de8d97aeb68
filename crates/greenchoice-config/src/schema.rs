//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use greenchoice_protocols::{QueryStyle, SiteTarget};
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub scrape: ScrapeConfig,

    #[serde(default)]
    pub comparison: ComparisonConfig,

    #[serde(default = "default_sites")]
    pub sites: Vec<SiteTarget>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            browser: BrowserConfig::default(),
            scrape: ScrapeConfig::default(),
            comparison: ComparisonConfig::default(),
            sites: default_sites(),
        }
    }
}

/// Sustainability scoring backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_backend_timeout(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_backend_timeout() -> u64 {
    15
}

/// Browser reached over the DevTools protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    #[serde(default)]
    pub headless: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_dir: Option<PathBuf>,

    /// Page-side collector injected into tabs that do not answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_script: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            headless: false,
            profile_dir: None,
            collector_script: None,
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

/// Hidden-tab scrape timing, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    #[serde(default = "default_hydrate_delay")]
    pub hydrate_delay_ms: u64,

    #[serde(default = "default_slow_hydrate_delay")]
    pub slow_hydrate_delay_ms: u64,

    #[serde(default = "default_hard_timeout")]
    pub hard_timeout_ms: u64,

    #[serde(default = "default_slow_hard_timeout")]
    pub slow_hard_timeout_ms: u64,

    #[serde(default = "default_inject_retry_delay")]
    pub inject_retry_delay_ms: u64,

    #[serde(default = "default_slow_empty_retry")]
    pub slow_empty_retry_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            hydrate_delay_ms: default_hydrate_delay(),
            slow_hydrate_delay_ms: default_slow_hydrate_delay(),
            hard_timeout_ms: default_hard_timeout(),
            slow_hard_timeout_ms: default_slow_hard_timeout(),
            inject_retry_delay_ms: default_inject_retry_delay(),
            slow_empty_retry_ms: default_slow_empty_retry(),
        }
    }
}

fn default_hydrate_delay() -> u64 {
    1800
}

fn default_slow_hydrate_delay() -> u64 {
    4500
}

fn default_hard_timeout() -> u64 {
    15_000
}

fn default_slow_hard_timeout() -> u64 {
    22_000
}

fn default_inject_retry_delay() -> u64 {
    600
}

fn default_slow_empty_retry() -> u64 {
    2500
}

/// Cross-site ranking limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Candidates per site sent for scoring.
    #[serde(default = "default_per_site_limit")]
    pub per_site_limit: usize,

    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            per_site_limit: default_per_site_limit(),
            top_k: default_top_k(),
        }
    }
}

fn default_per_site_limit() -> usize {
    8
}

fn default_top_k() -> usize {
    5
}

/// Amazon, Flipkart, Myntra and Meesho, searched in that order.
pub fn default_sites() -> Vec<SiteTarget> {
    vec![
        SiteTarget::new(
            "Amazon",
            "https://www.amazon.in/s?k={query}",
            "scrapeAmazonResults",
        ),
        SiteTarget::new(
            "Flipkart",
            "https://www.flipkart.com/search?q={query}",
            "scrapeFlipkartResults",
        ),
        SiteTarget::new(
            "Myntra",
            "https://www.myntra.com/search?q={query}",
            "scrapeMyntraResults",
        )
        .strict()
        .slow_render()
        .with_query_style(QueryStyle::Clean),
        SiteTarget::new(
            "Meesho",
            "https://www.meesho.com/search?q={query}",
            "scrapeMeeshoResults",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:5000");
        assert_eq!(config.backend.timeout(), Duration::from_secs(15));
        assert_eq!(config.browser.debug_port, 9222);
        assert_eq!(config.scrape.hydrate_delay_ms, 1800);
        assert_eq!(config.scrape.slow_hard_timeout_ms, 22_000);
        assert_eq!(config.comparison.per_site_limit, 8);
        assert_eq!(config.comparison.top_k, 5);
    }

    #[test]
    fn test_default_sites_order() {
        let names: Vec<String> = default_sites().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Amazon", "Flipkart", "Myntra", "Meesho"]);
    }

    #[test]
    fn test_only_myntra_is_strict() {
        let sites = default_sites();
        let strict: Vec<&str> = sites.iter().filter(|s| s.strict).map(|s| s.name.as_str()).collect();
        assert_eq!(strict, vec!["Myntra"]);
        let myntra = &sites[2];
        assert!(myntra.slow_render);
        assert_eq!(myntra.query_style, QueryStyle::Clean);
    }

    #[test]
    fn test_default_templates_have_placeholder() {
        for site in default_sites() {
            assert!(site.search_url_template.contains("{query}"), "{}", site.name);
        }
    }
}
