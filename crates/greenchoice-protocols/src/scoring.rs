//! Remote sustainability scoring protocol.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::category::{Category, Classification, Gender};
use crate::error::ScoringError;
use crate::product::{Listing, NormalizedProduct, ProductDescriptor, RawProduct, ScoredProduct};

/// Free-text classification request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub title: String,
    pub breadcrumb: String,
    pub description: String,
}

impl From<&ProductDescriptor> for ClassifyRequest {
    fn from(product: &ProductDescriptor) -> Self {
        Self {
            title: product.title.clone(),
            breadcrumb: product.breadcrumb.clone(),
            description: product.description.clone(),
        }
    }
}

/// Raw classifier answer. Tags are free text and may fall outside the
/// known category set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub gender: String,
}

impl ClassifyResponse {
    pub fn classification(&self) -> Classification {
        Classification::new(
            Category::from_tag(&self.category),
            Gender::from_tag(&self.gender),
        )
    }
}

/// One product submitted for scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequestItem {
    pub title: String,
    pub url: String,
    pub price: String,
}

impl ScoreRequestItem {
    pub fn from_listing<L: Listing>(listing: &L, price: &str) -> Self {
        Self {
            title: listing.title().to_string(),
            url: listing.url().to_string(),
            price: price.to_string(),
        }
    }
}

impl From<&NormalizedProduct> for ScoreRequestItem {
    fn from(product: &NormalizedProduct) -> Self {
        Self::from_listing(product, product.price())
    }
}

impl From<&ProductDescriptor> for ScoreRequestItem {
    fn from(product: &ProductDescriptor) -> Self {
        Self {
            title: product.title.clone(),
            url: product.url.clone(),
            price: product.price.clone(),
        }
    }
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One scored product returned by the backend.
///
/// The backend passes model output through as-is, so any field may be null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    #[serde(default, alias = "title", deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub price: String,

    #[serde(rename = "numericScore", default, deserialize_with = "null_as_default")]
    pub numeric_score: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub grade: String,
}

impl ScoredItem {
    /// Attach the originating site and freeze into a [`ScoredProduct`].
    pub fn into_scored(self, site: &str) -> ScoredProduct {
        let product = RawProduct {
            title: self.name,
            url: self.url,
            price: self.price,
            image: None,
            site: site.to_string(),
        };
        ScoredProduct::new(NormalizedProduct::new(product), self.numeric_score, self.grade)
    }
}

/// Core trait for the sustainability scoring backend.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Classify a product from free text.
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassifyResponse, ScoringError>;

    /// Score a batch of products. The backend may reorder or drop entries.
    async fn score(&self, products: &[ScoreRequestItem]) -> Result<Vec<ScoredItem>, ScoringError>;
}
