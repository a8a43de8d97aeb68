//! Target sites and the page collector message shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::product::RawProduct;

/// Collector action returning the product shown on a detail page.
pub const ACTION_PRODUCT_DATA: &str = "getProductData";

/// Collector action returning related products listed on a detail page.
pub const ACTION_ALTERNATIVES: &str = "getAlternatives";

/// Which query a site receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStyle {
    /// The category/gender aware smart query.
    #[default]
    Smart,
    /// The narrow whitelist-only query for sites that punish noisy queries.
    Clean,
}

/// One site searched during a cross-site comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteTarget {
    pub name: String,

    /// Search page URL with a `{query}` placeholder.
    pub search_url_template: String,

    /// Collector action that scrapes this site's result grid.
    pub scrape_action: String,

    /// Return nothing rather than fall back to weakly relevant results.
    #[serde(default)]
    pub strict: bool,

    /// The result grid renders well after the load event.
    #[serde(default)]
    pub slow_render: bool,

    #[serde(default)]
    pub query_style: QueryStyle,
}

impl SiteTarget {
    pub fn new(
        name: impl Into<String>,
        search_url_template: impl Into<String>,
        scrape_action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            search_url_template: search_url_template.into(),
            scrape_action: scrape_action.into(),
            strict: false,
            slow_render: false,
            query_style: QueryStyle::Smart,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn slow_render(mut self) -> Self {
        self.slow_render = true;
        self
    }

    pub fn with_query_style(mut self, style: QueryStyle) -> Self {
        self.query_style = style;
        self
    }

    /// Build the search URL for `query` (form-urlencoded).
    pub fn search_url(&self, query: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.search_url_template.replace("{query}", &encoded)
    }
}

/// Request sent to a page collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorRequest {
    pub action: String,
}

impl CollectorRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
        }
    }

    pub fn product_data() -> Self {
        Self::new(ACTION_PRODUCT_DATA)
    }

    pub fn alternatives() -> Self {
        Self::new(ACTION_ALTERNATIVES)
    }
}

/// Products scraped from one site, tagged with the site name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteScrape {
    pub site: String,
    pub products: Vec<RawProduct>,
}

impl SiteScrape {
    pub fn empty(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            products: Vec::new(),
        }
    }

    /// Normalize a collector response.
    ///
    /// Collectors answer either with a bare array of products or with an
    /// object wrapping one under `products`. Anything else is an empty result.
    pub fn from_response(site: impl Into<String>, response: Value) -> Self {
        let site = site.into();
        let items = match serde_json::from_value::<CollectorPayload>(response) {
            Ok(CollectorPayload::Items(items)) => items,
            Ok(CollectorPayload::Wrapped { products }) => products,
            Err(_) => Vec::new(),
        };

        let products = items
            .into_iter()
            .map(|item| item.into_raw(&site))
            .collect();

        Self { site, products }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CollectorPayload {
    Items(Vec<CollectedItem>),
    Wrapped { products: Vec<CollectedItem> },
}

#[derive(Deserialize)]
struct CollectedItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    price: Option<Value>,
    #[serde(default)]
    image: Option<String>,
}

impl CollectedItem {
    fn into_raw(self, site: &str) -> RawProduct {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .or(self.name)
            .unwrap_or_default();

        let price = match self.price {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        RawProduct {
            title,
            url: self.url.unwrap_or_default(),
            price,
            image: self.image.filter(|i| !i.is_empty()),
            site: site.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "site_tests.rs"]
mod tests;
