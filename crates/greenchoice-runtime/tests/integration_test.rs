//! End-to-end comparison through the public runtime API.
//!
//! A scripted browser serves search result grids per host and a scripted
//! backend scores by a keyword in the title.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use serde_json::{json, Value};

use greenchoice_config::{default_sites, ConfigLoader};
use greenchoice_protocols::{
    Category, ClassifyRequest, ClassifyResponse, CollectorRequest, Gender, Listing,
    ProductDescriptor, ScoreRequestItem, ScoredItem, ScoringError, ScoringService, TabDriver,
    TabError, TabId, TabStatus, TabStatusStream,
};
use greenchoice_runtime::{
    ComparisonDriver, ComparisonOutcome, ComparisonSettings, ScrapeOrchestrator, ScrapeTiming,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Serves a fixed result grid per host. Tracks open tabs.
struct ScriptedBrowser {
    next_id: AtomicU64,
    grids: HashMap<&'static str, Value>,
    tabs: Mutex<HashMap<TabId, String>>,
    closed: Mutex<Vec<TabId>>,
}

impl ScriptedBrowser {
    fn new(grids: HashMap<&'static str, Value>) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            grids,
            tabs: Mutex::new(HashMap::new()),
            closed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TabDriver for ScriptedBrowser {
    async fn open_hidden_tab(&self, url: &str) -> Result<TabId, TabError> {
        let tab = TabId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.tabs.lock().insert(tab, url.to_string());
        Ok(tab)
    }

    async fn close_tab(&self, tab: TabId) -> Result<(), TabError> {
        self.tabs.lock().remove(&tab);
        self.closed.lock().push(tab);
        Ok(())
    }

    async fn send_to_tab(&self, tab: TabId, _request: &CollectorRequest) -> Result<Value, TabError> {
        let url = self
            .tabs
            .lock()
            .get(&tab)
            .cloned()
            .ok_or(TabError::TabNotFound(tab.0))?;
        let grid = self
            .grids
            .iter()
            .find(|(host, _)| url.contains(*host))
            .map(|(_, grid)| grid.clone())
            .unwrap_or_else(|| json!([]));
        Ok(grid)
    }

    async fn inject_collector(&self, _tab: TabId) -> Result<(), TabError> {
        Ok(())
    }

    async fn status_changes(&self, _tab: TabId) -> Result<TabStatusStream, TabError> {
        Ok(Box::pin(stream::iter(vec![TabStatus::Loading, TabStatus::Complete])))
    }
}

/// Scores "organic" titles high and everything else low.
struct KeywordBackend;

#[async_trait]
impl ScoringService for KeywordBackend {
    async fn classify(&self, _request: &ClassifyRequest) -> Result<ClassifyResponse, ScoringError> {
        Ok(ClassifyResponse {
            category: "clothing".to_string(),
            gender: "male".to_string(),
        })
    }

    async fn score(&self, products: &[ScoreRequestItem]) -> Result<Vec<ScoredItem>, ScoringError> {
        Ok(products
            .iter()
            .map(|p| {
                let organic = p.title.to_lowercase().contains("organic");
                ScoredItem {
                    name: p.title.clone(),
                    url: p.url.clone(),
                    price: p.price.clone(),
                    numeric_score: if organic { 90.0 } else { 40.0 },
                    grade: if organic { "A" } else { "D" }.to_string(),
                }
            })
            .collect())
    }
}

fn fast_timing() -> ScrapeTiming {
    ScrapeTiming {
        hydrate_delay: Duration::from_millis(10),
        slow_hydrate_delay: Duration::from_millis(20),
        hard_timeout: Duration::from_secs(1),
        slow_hard_timeout: Duration::from_secs(2),
        inject_retry_delay: Duration::from_millis(5),
        slow_empty_retry: Duration::from_millis(5),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_hoodie_comparison_excludes_shirts() {
    let grids = HashMap::from([
        (
            "amazon.in",
            json!([
                {"title": "Men Organic Cotton Hoodie Sweatshirt", "url": "https://www.amazon.in/dp/A1?ref=1", "price": "₹1,299"},
                {"title": "Classic Formal Shirt for Men", "url": "https://www.amazon.in/dp/A2", "price": "₹799"}
            ]),
        ),
        (
            "flipkart.com",
            json!({"products": [
                {"title": "Men Fleece Hoodie", "url": "https://www.flipkart.com/p/F1", "price": "₹999"},
                {"title": "Women Cropped Hoodie", "url": "https://www.flipkart.com/p/F2", "price": "₹899"}
            ]}),
        ),
    ]);
    let browser = Arc::new(ScriptedBrowser::new(grids));

    let comparison = ComparisonDriver::new(
        ScrapeOrchestrator::new(browser.clone(), fast_timing()),
        Arc::new(KeywordBackend),
        default_sites(),
        ComparisonSettings::default(),
    );

    let product = ProductDescriptor::new("Men's Cotton Hoodie Sweatshirt").with_breadcrumb("Clothing > Men > Hoodies");
    let outcome = comparison.compare_across_sites(&product).await;

    let ComparisonOutcome::Ranked {
        classification,
        products,
        ..
    } = outcome
    else {
        panic!("expected ranked products");
    };

    assert_eq!(classification.category, Category::Clothing);
    assert_eq!(classification.gender, Gender::Male);

    let titles: Vec<&str> = products.iter().map(|p| p.title()).collect();
    assert_eq!(titles, vec!["Men Organic Cotton Hoodie Sweatshirt", "Men Fleece Hoodie"]);
    assert_eq!(products[0].url(), "https://www.amazon.in/dp/A1");
    assert_eq!(products[0].grade(), "A");

    assert!(browser.tabs.lock().is_empty());
    assert_eq!(browser.closed.lock().len(), 4);
}

#[tokio::test]
async fn test_configured_sites_drive_comparison() {
    let config = ConfigLoader::load_str(
        r#"
            [comparison]
            top_k = 1

            [[sites]]
            name = "Ajio"
            search_url_template = "https://www.ajio.com/search/?text={query}"
            scrape_action = "scrapeAjioResults"
        "#,
    )
    .unwrap();

    let grids = HashMap::from([(
        "ajio.com",
        json!([
            {"title": "Men Organic Hoodie", "url": "https://www.ajio.com/p/1"},
            {"title": "Men Zip Hoodie", "url": "https://www.ajio.com/p/2"}
        ]),
    )]);
    let browser = Arc::new(ScriptedBrowser::new(grids));

    let comparison = ComparisonDriver::new(
        ScrapeOrchestrator::new(browser.clone(), fast_timing()),
        Arc::new(KeywordBackend),
        config.sites.clone(),
        ComparisonSettings::from(&config.comparison),
    );

    let outcome = comparison
        .compare_across_sites(&ProductDescriptor::new("Men Grey Hoodie"))
        .await;

    match outcome {
        ComparisonOutcome::Ranked { products, query, .. } => {
            assert_eq!(query, "men grey hoodie");
            assert_eq!(products.len(), 1);
            assert_eq!(products[0].title(), "Men Organic Hoodie");
            assert_eq!(products[0].site(), "Ajio");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
