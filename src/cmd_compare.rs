//! Browser-backed subcommands: `compare` and `best`.

use std::sync::Arc;

use serde_json::json;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

use greenchoice_config::Config;
use greenchoice_protocols::{
    Listing, ProductDescriptor, ScoredProduct, ScoringService, TabDriver, TabError, TabId,
};
use greenchoice_runtime::{
    best_on_page, wait_for_complete, ComparisonDriver, ComparisonOutcome, ComparisonSettings,
    PageBest, RuntimeError, SafeSendPolicy, ScrapeOrchestrator, ScrapeTiming,
};
use greenchoice_scoring_http::HttpScoringService;
use greenchoice_tabs_cdp::{Browser, CdpTabDriver};

use crate::cli::OutputFormat;

async fn connect(config: &Config) -> Result<(Browser, Arc<CdpTabDriver>), Box<dyn std::error::Error>> {
    let browser = Browser::launch_or_connect(&config.browser).await?;
    let driver = Arc::new(CdpTabDriver::new(
        browser.client(),
        config.browser.collector_script.clone(),
    ));
    if config.browser.collector_script.is_none() {
        warn!("No collector script configured; tabs without a collector will return nothing");
    }
    Ok((browser, driver))
}

pub async fn handle_compare_command(
    config: &Config,
    product: ProductDescriptor,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (browser, driver) = connect(config).await?;
    let scoring = Arc::new(HttpScoringService::from_config(&config.backend)?);

    let comparison = ComparisonDriver::new(
        ScrapeOrchestrator::new(driver, ScrapeTiming::from(&config.scrape)),
        scoring,
        config.sites.clone(),
        ComparisonSettings::from(&config.comparison),
    );

    info!("Comparing '{}' across {} sites", product.title, comparison.sites().len());
    let outcome = comparison.compare_across_sites(&product).await;
    browser.shutdown().await;

    match outcome {
        ComparisonOutcome::LowConfidence => match format {
            OutputFormat::Json => println!("{}", json!({"lowConfidence": true})),
            OutputFormat::Table => {
                println!("Could not tell what kind of product this is; no sites were searched.")
            }
        },
        ComparisonOutcome::Ranked {
            classification,
            query,
            products,
        } => match format {
            OutputFormat::Json => {
                let out = json!({
                    "category": classification.category,
                    "gender": classification.gender,
                    "query": query,
                    "products": products,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            OutputFormat::Table => {
                println!(
                    "{} / {} - searched for \"{}\"",
                    classification.category, classification.gender, query
                );
                println!();
                if products.is_empty() {
                    println!("No sustainable alternatives found.");
                } else {
                    print_table(&products);
                }
            }
        },
    }

    Ok(())
}

pub async fn handle_best_command(
    config: &Config,
    url: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (browser, driver) = connect(config).await?;
    let scoring = HttpScoringService::from_config(&config.backend)?;
    let timing = ScrapeTiming::from(&config.scrape);

    let tab = driver.open_hidden_tab(url).await?;
    let result = inspect_page(driver.as_ref(), &scoring, tab, &timing).await;

    if let Err(e) = driver.close_tab(tab).await {
        warn!("Failed to close {}: {}", tab, e);
    }
    browser.shutdown().await;

    let page = result?;

    match format {
        OutputFormat::Json => {
            let out = json!({
                "current": page.current,
                "best": page.best,
                "isCurrent": page.is_current,
                "scored": page.scored,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            if page.is_current {
                println!("'{}' is already the most sustainable choice on this page.", page.current.title);
            } else {
                println!(
                    "Better choice: {} (grade {}, score {:.1})",
                    page.best.title(),
                    page.best.grade(),
                    page.best.numeric_score()
                );
            }
            println!();
            print_table(&page.scored);
        }
    }

    Ok(())
}

async fn inspect_page(
    driver: &dyn TabDriver,
    scoring: &dyn ScoringService,
    tab: TabId,
    timing: &ScrapeTiming,
) -> Result<PageBest, RuntimeError> {
    timeout(timing.hard_timeout, wait_for_complete(driver, tab))
        .await
        .map_err(|_| TabError::Timeout(timing.hard_timeout.as_millis() as u64))??;
    sleep(timing.hydrate_delay).await;

    let policy = SafeSendPolicy {
        retries: 1,
        delay: timing.inject_retry_delay,
    };
    best_on_page(driver, scoring, tab, &policy).await
}

fn print_table(products: &[ScoredProduct]) {
    println!("{:<4} {:<10} {:<6} {:<6} {:<10} {}", "#", "SITE", "GRADE", "SCORE", "PRICE", "TITLE");
    for (i, p) in products.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:<6} {:<6.1} {:<10} {}",
            i + 1,
            p.site(),
            p.grade(),
            p.numeric_score(),
            p.price(),
            p.title()
        );
        if !p.url().is_empty() {
            println!("     {}", p.url());
        }
    }
}
