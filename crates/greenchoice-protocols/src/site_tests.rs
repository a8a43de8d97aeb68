use super::*;
use serde_json::json;

#[test]
fn test_search_url_encodes_query() {
    let site = SiteTarget::new("Amazon", "https://www.amazon.in/s?k={query}", "scrapeAmazonResults");
    assert_eq!(
        site.search_url("women kurti & dupatta"),
        "https://www.amazon.in/s?k=women+kurti+%26+dupatta"
    );
}

#[test]
fn test_site_target_builders() {
    let site = SiteTarget::new("Myntra", "https://www.myntra.com/search?q={query}", "scrapeMyntraResults")
        .strict()
        .slow_render()
        .with_query_style(QueryStyle::Clean);
    assert!(site.strict);
    assert!(site.slow_render);
    assert_eq!(site.query_style, QueryStyle::Clean);
}

#[test]
fn test_site_target_deserialize_defaults() {
    let site: SiteTarget = serde_json::from_value(json!({
        "name": "Meesho",
        "search_url_template": "https://www.meesho.com/search?q={query}",
        "scrape_action": "scrapeMeeshoResults"
    }))
    .unwrap();
    assert!(!site.strict);
    assert!(!site.slow_render);
    assert_eq!(site.query_style, QueryStyle::Smart);
}

#[test]
fn test_collector_request_serialize() {
    let json = serde_json::to_string(&CollectorRequest::product_data()).unwrap();
    assert_eq!(json, r#"{"action":"getProductData"}"#);
}

#[test]
fn test_from_response_bare_array() {
    let scrape = SiteScrape::from_response(
        "Flipkart",
        json!([
            {"title": "Cotton Kurti", "url": "https://f.example/p/1", "price": "₹499"},
            {"name": "Rayon Kurti", "url": "https://f.example/p/2", "price": 650}
        ]),
    );
    assert_eq!(scrape.site, "Flipkart");
    assert_eq!(scrape.products.len(), 2);
    assert_eq!(scrape.products[0].price, "₹499");
    assert_eq!(scrape.products[1].title, "Rayon Kurti");
    assert_eq!(scrape.products[1].price, "650");
    assert!(scrape.products.iter().all(|p| p.site == "Flipkart"));
}

#[test]
fn test_from_response_wrapped_object() {
    let scrape = SiteScrape::from_response(
        "Myntra",
        json!({"site": "ignored", "products": [{"title": "Kurta Set", "url": "", "image": null}]}),
    );
    assert_eq!(scrape.site, "Myntra");
    assert_eq!(scrape.products.len(), 1);
    assert!(scrape.products[0].image.is_none());
}

#[test]
fn test_from_response_unexpected_shapes() {
    assert!(SiteScrape::from_response("Amazon", json!(null)).is_empty());
    assert!(SiteScrape::from_response("Amazon", json!("oops")).is_empty());
    assert!(SiteScrape::from_response("Amazon", json!({"items": []})).is_empty());
}
