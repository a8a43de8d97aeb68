//! Product records flowing through the comparison pipeline.
//!
//! A [`RawProduct`] comes straight out of a page collector. The dedup stage
//! turns it into a [`NormalizedProduct`] (canonical URL, stable key), and the
//! scoring round-trip wraps that into an immutable [`ScoredProduct`].

use serde::{Deserialize, Serialize};
use url::Url;

/// Read access shared by every product shape.
pub trait Listing {
    fn title(&self) -> &str;

    fn url(&self) -> &str;

    fn site(&self) -> &str;

    /// Canonical URL when one is present, else the lowercase trimmed title.
    ///
    /// An empty key means the listing has no identity and cannot be deduplicated.
    fn dedup_key(&self) -> String {
        let url_key = canonical_url(self.url());
        if url_key.is_empty() {
            self.title().trim().to_lowercase()
        } else {
            url_key
        }
    }
}

/// Strip query string and fragment, keeping scheme, host and path.
///
/// Relative or otherwise unparseable URLs are cut at the first `#` and `?`.
pub fn canonical_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_query(None);
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => {
            let without_fragment = raw.split('#').next().unwrap_or_default();
            without_fragment
                .split('?')
                .next()
                .unwrap_or_default()
                .to_string()
        }
    }
}

/// A product as scraped from a site, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    /// Display price, e.g. "₹1,299". May be empty.
    #[serde(default)]
    pub price: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub site: String,
}

impl RawProduct {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = price.into();
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into();
        self
    }
}

impl Listing for RawProduct {
    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn site(&self) -> &str {
        &self.site
    }
}

/// A scraped product with a canonical URL and a precomputed dedup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    #[serde(flatten)]
    pub product: RawProduct,

    pub key: String,
}

impl NormalizedProduct {
    pub fn new(mut product: RawProduct) -> Self {
        product.url = canonical_url(&product.url);
        let key = product.dedup_key();
        Self { product, key }
    }

    pub fn price(&self) -> &str {
        &self.product.price
    }

    /// Re-tag the product with the site it was scraped from.
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.product.site = site.into();
        self
    }
}

impl From<RawProduct> for NormalizedProduct {
    fn from(product: RawProduct) -> Self {
        Self::new(product)
    }
}

impl Listing for NormalizedProduct {
    fn title(&self) -> &str {
        &self.product.title
    }

    fn url(&self) -> &str {
        &self.product.url
    }

    fn site(&self) -> &str {
        &self.product.site
    }

    fn dedup_key(&self) -> String {
        self.key.clone()
    }
}

/// A normalized product annotated by the scoring backend. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    product: NormalizedProduct,

    #[serde(rename = "numericScore")]
    numeric_score: f64,

    grade: String,
}

impl ScoredProduct {
    pub fn new(product: NormalizedProduct, numeric_score: f64, grade: impl Into<String>) -> Self {
        Self {
            product,
            numeric_score,
            grade: grade.into(),
        }
    }

    pub fn product(&self) -> &NormalizedProduct {
        &self.product
    }

    pub fn numeric_score(&self) -> f64 {
        self.numeric_score
    }

    pub fn grade(&self) -> &str {
        &self.grade
    }

    pub fn price(&self) -> &str {
        self.product.price()
    }
}

impl Listing for ScoredProduct {
    fn title(&self) -> &str {
        self.product.title()
    }

    fn url(&self) -> &str {
        self.product.url()
    }

    fn site(&self) -> &str {
        self.product.site()
    }

    fn dedup_key(&self) -> String {
        self.product.dedup_key()
    }
}

/// The reference product a comparison starts from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDescriptor {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub breadcrumb: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub price: String,
}

impl ProductDescriptor {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_breadcrumb(mut self, breadcrumb: impl Into<String>) -> Self {
        self.breadcrumb = breadcrumb.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
