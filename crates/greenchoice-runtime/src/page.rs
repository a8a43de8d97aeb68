//! Best sustainable choice among the products shown on one page.

use greenchoice_protocols::{
    canonical_url, CollectorRequest, Listing, ProductDescriptor, ScoreRequestItem, ScoredProduct,
    ScoringService, SiteScrape, TabDriver, TabId,
};
use serde_json::Value;
use tracing::debug;

use crate::error::RuntimeError;
use crate::messaging::{send_message_safe, SafeSendPolicy};

/// Title used when the page reports a product without one.
const CURRENT_PRODUCT_TITLE: &str = "Current product";

#[derive(Debug, Clone, PartialEq)]
pub struct PageBest {
    /// The product the page is about.
    pub current: ProductDescriptor,
    /// Highest-scored entry among the product and its on-page alternatives.
    pub best: ScoredProduct,
    /// Whether `best` is the product the page is about.
    pub is_current: bool,
    /// Every scored entry, best first.
    pub scored: Vec<ScoredProduct>,
}

/// Score the product on an open page together with the alternatives the page
/// lists, and report the best one.
pub async fn best_on_page(
    driver: &dyn TabDriver,
    scoring: &dyn ScoringService,
    tab: TabId,
    policy: &SafeSendPolicy,
) -> Result<PageBest, RuntimeError> {
    let product = send_message_safe(driver, tab, &CollectorRequest::product_data(), policy).await?;
    let mut current = parse_product(product)?;
    if current.title.trim().is_empty() {
        current.title = CURRENT_PRODUCT_TITLE.to_string();
    }

    let alternatives = send_message_safe(driver, tab, &CollectorRequest::alternatives(), policy).await?;
    let alternatives = SiteScrape::from_response("", alternatives).products;
    debug!("'{}' has {} on-page alternatives", current.title, alternatives.len());

    let mut items = vec![ScoreRequestItem::from(&current)];
    items.extend(
        alternatives
            .iter()
            .map(|p| ScoreRequestItem::from_listing(p, &p.price)),
    );

    let mut scored: Vec<ScoredProduct> = scoring
        .score(&items)
        .await?
        .into_iter()
        .map(|item| item.into_scored(""))
        .collect();
    scored.sort_by(|a, b| b.numeric_score().total_cmp(&a.numeric_score()));

    let best = scored
        .first()
        .cloned()
        .ok_or_else(|| RuntimeError::NothingScored(current.title.clone()))?;

    let is_current = best.title() == current.title
        || (!best.url().is_empty() && best.url() == canonical_url(&current.url));

    Ok(PageBest {
        current,
        best,
        is_current,
        scored,
    })
}

fn parse_product(value: Value) -> Result<ProductDescriptor, RuntimeError> {
    if value.is_null() {
        return Err(RuntimeError::UnsupportedPage("no product data".to_string()));
    }
    serde_json::from_value(value).map_err(|e| RuntimeError::UnsupportedPage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeScoring, FakeTabDriver};
    use greenchoice_protocols::TabError;
    use serde_json::json;

    async fn open_tab(driver: &FakeTabDriver) -> TabId {
        driver.open_hidden_tab("https://shop.example/p/1").await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_alternative_wins() {
        let driver = FakeTabDriver::new();
        driver.script(
            "getProductData",
            vec![Ok(json!({"title": "Polyester Kurti", "url": "https://shop.example/p/1?src=home", "price": "₹299"}))],
        );
        driver.script(
            "getAlternatives",
            vec![Ok(json!([
                {"title": "Organic Cotton Kurti", "url": "https://shop.example/p/2", "price": "₹699"},
                {"title": "Rayon Kurti", "url": "https://shop.example/p/3", "price": "₹399"}
            ]))],
        );
        let scoring = FakeScoring::new()
            .scoring("Polyester Kurti", 30.0)
            .scoring("Organic Cotton Kurti", 88.0)
            .scoring("Rayon Kurti", 55.0);
        let tab = open_tab(&driver).await;

        let page = best_on_page(&driver, &scoring, tab, &SafeSendPolicy::default()).await.unwrap();

        assert_eq!(page.best.title(), "Organic Cotton Kurti");
        assert!(!page.is_current);
        assert_eq!(page.scored.len(), 3);
        assert_eq!(scoring.score_calls()[0][0].title, "Polyester Kurti");
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_product_wins_by_url() {
        let driver = FakeTabDriver::new();
        driver.script(
            "getProductData",
            vec![Ok(json!({"title": "Bamboo Toothbrush", "url": "https://shop.example/p/1?x=1"}))],
        );
        driver.script(
            "getAlternatives",
            vec![Ok(json!([{"title": "Plastic Toothbrush", "url": "https://shop.example/p/7"}]))],
        );
        let scoring = FakeScoring::new()
            .scoring("Bamboo Toothbrush", 91.0)
            .scoring("Plastic Toothbrush", 20.0);
        let tab = open_tab(&driver).await;

        let page = best_on_page(&driver, &scoring, tab, &SafeSendPolicy::default()).await.unwrap();
        assert!(page.is_current);
    }

    #[tokio::test(start_paused = true)]
    async fn test_untitled_product_gets_placeholder() {
        let driver = FakeTabDriver::new();
        driver.script("getProductData", vec![Ok(json!({"url": ""}))]);
        let scoring = FakeScoring::new();
        let tab = open_tab(&driver).await;

        let page = best_on_page(&driver, &scoring, tab, &SafeSendPolicy::default()).await.unwrap();
        assert_eq!(page.current.title, "Current product");
        assert!(page.is_current);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_page() {
        let driver = FakeTabDriver::new();
        driver.script("getProductData", vec![Ok(Value::Null)]);
        let tab = open_tab(&driver).await;

        let err = best_on_page(&driver, &FakeScoring::new(), tab, &SafeSendPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnsupportedPage(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_alternatives_error_propagates() {
        let driver = FakeTabDriver::new();
        driver.script("getProductData", vec![Ok(json!({"title": "Kurti"}))]);
        driver.script("getAlternatives", vec![Err(TabError::Timeout(30_000))]);
        let tab = open_tab(&driver).await;

        let err = best_on_page(&driver, &FakeScoring::new(), tab, &SafeSendPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Tab(TabError::Timeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scoring_error_propagates() {
        let driver = FakeTabDriver::new();
        driver.script("getProductData", vec![Ok(json!({"title": "Kurti"}))]);
        let tab = open_tab(&driver).await;

        let err = best_on_page(&driver, &FakeScoring::new().failing_score(), tab, &SafeSendPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::Scoring(_)));
    }
}
