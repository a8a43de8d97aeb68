//! Cross-site comparison.

use std::sync::Arc;

use greenchoice_config::ComparisonConfig;
use greenchoice_matching::{
    build_clean_query, dedupe_scraped_products, detect_category_and_gender,
    detect_category_from_breadcrumb, filter_by_category_and_gender, filter_relevant_products,
    make_smart_query, rank_best, RelevanceOptions,
};
use greenchoice_protocols::{
    Category, Classification, ClassifyRequest, Gender, NormalizedProduct, ProductDescriptor,
    QueryStyle, ScoreRequestItem, ScoredProduct, ScoringService, SiteTarget,
};
use tracing::{debug, info, warn};

use crate::orchestrator::ScrapeOrchestrator;

#[derive(Debug, Clone)]
pub struct ComparisonSettings {
    /// Candidates per site sent for scoring.
    pub per_site_limit: usize,
    /// Products in the final ranking.
    pub top_k: usize,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self::from(&ComparisonConfig::default())
    }
}

impl From<&ComparisonConfig> for ComparisonSettings {
    fn from(config: &ComparisonConfig) -> Self {
        Self {
            per_site_limit: config.per_site_limit,
            top_k: config.top_k,
        }
    }
}

/// Result of a cross-site comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    /// Best-scored products across every site, best first. May be empty.
    Ranked {
        classification: Classification,
        query: String,
        products: Vec<ScoredProduct>,
    },
    /// No category could be determined, so no search was attempted.
    LowConfidence,
}

/// Merge the remote classification with the local fallbacks.
///
/// A remote category outside the known set is replaced by local detection
/// (title and breadcrumb), which may also fill in a unisex gender. The
/// breadcrumb alone is the last resort.
pub fn resolve_classification(remote: Classification, product: &ProductDescriptor) -> Classification {
    let mut resolved = remote;

    if !resolved.category.is_known() {
        let local = detect_category_and_gender(&product.title, &product.breadcrumb);
        if local.category.is_known() {
            resolved.category = local.category;
        }
        if resolved.gender == Gender::Unisex && local.gender != Gender::Unisex {
            resolved.gender = local.gender;
        }
    }

    if !resolved.category.is_known() {
        resolved.category = detect_category_from_breadcrumb(&product.breadcrumb);
    }

    resolved
}

/// Runs the comparison: classify, search every site, filter, score, rank.
pub struct ComparisonDriver {
    orchestrator: ScrapeOrchestrator,
    scoring: Arc<dyn ScoringService>,
    sites: Vec<SiteTarget>,
    settings: ComparisonSettings,
}

impl ComparisonDriver {
    pub fn new(
        orchestrator: ScrapeOrchestrator,
        scoring: Arc<dyn ScoringService>,
        sites: Vec<SiteTarget>,
        settings: ComparisonSettings,
    ) -> Self {
        Self {
            orchestrator,
            scoring,
            sites,
            settings,
        }
    }

    pub fn sites(&self) -> &[SiteTarget] {
        &self.sites
    }

    /// Classify `product`, preferring the remote classifier.
    pub async fn classify(&self, product: &ProductDescriptor) -> Classification {
        let remote = match self.scoring.classify(&ClassifyRequest::from(product)).await {
            Ok(response) => response.classification(),
            Err(e) => {
                warn!("Remote classification failed, using local detection: {}", e);
                Classification::unknown()
            }
        };
        resolve_classification(remote, product)
    }

    /// Compare `product` against every configured site.
    ///
    /// Sites are searched one after another, so at most one hidden tab is
    /// open at any time.
    pub async fn compare_across_sites(&self, product: &ProductDescriptor) -> ComparisonOutcome {
        let classification = self.classify(product).await;
        if classification.category == Category::Unknown {
            info!("Could not detect a category for '{}'", product.title);
            return ComparisonOutcome::LowConfidence;
        }
        info!(
            "Classified '{}' as {}/{}",
            product.title, classification.category, classification.gender
        );

        let query = make_smart_query(
            &product.title,
            &product.breadcrumb,
            classification.category,
            classification.gender,
        );

        let mut scored_all = Vec::new();
        for site in &self.sites {
            let scored = self.compare_site(site, &query, classification).await;
            scored_all.extend(scored);
        }

        let products = rank_best(scored_all, self.settings.top_k);
        info!("Comparison finished with {} products", products.len());

        ComparisonOutcome::Ranked {
            classification,
            query,
            products,
        }
    }

    async fn compare_site(
        &self,
        site: &SiteTarget,
        smart_query: &str,
        classification: Classification,
    ) -> Vec<ScoredProduct> {
        let site_query = match site.query_style {
            QueryStyle::Smart => smart_query.to_string(),
            QueryStyle::Clean => build_clean_query(smart_query),
        };

        let scrape = self.orchestrator.scrape_site(site, &site_query).await;
        let candidates: Vec<NormalizedProduct> = dedupe_scraped_products(
            scrape
                .products
                .into_iter()
                .map(|p| NormalizedProduct::new(p).with_site(&site.name))
                .collect(),
        );

        let pool = filter_by_category_and_gender(
            &candidates,
            classification.category,
            classification.gender,
        );

        let mut relevant = filter_relevant_products(
            &pool,
            smart_query,
            RelevanceOptions { strict: site.strict },
        );
        if site.strict && relevant.is_empty() && !pool.is_empty() {
            debug!("{}: strict filter empty, retrying lenient", site.name);
            relevant = filter_relevant_products(&pool, smart_query, RelevanceOptions::lenient());
        }
        debug!(
            "{}: {} scraped, {} after category filter, {} relevant",
            site.name,
            candidates.len(),
            pool.len(),
            relevant.len()
        );

        let items: Vec<ScoreRequestItem> = relevant
            .iter()
            .take(self.settings.per_site_limit)
            .map(ScoreRequestItem::from)
            .filter(|item| !item.title.trim().is_empty())
            .collect();
        if items.is_empty() {
            return Vec::new();
        }

        match self.scoring.score(&items).await {
            Ok(scored) => scored
                .into_iter()
                .map(|item| item.into_scored(&site.name))
                .collect(),
            Err(e) => {
                warn!("{}: scoring failed: {}", site.name, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
