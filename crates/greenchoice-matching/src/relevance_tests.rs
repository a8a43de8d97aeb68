use super::*;
use greenchoice_protocols::{NormalizedProduct, RawProduct};

fn products(titles: &[&str]) -> Vec<NormalizedProduct> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| NormalizedProduct::new(RawProduct::new(*t, format!("https://shop.example/p/{i}"))))
        .collect()
}

fn titles(list: &[NormalizedProduct]) -> Vec<&str> {
    list.iter().map(|p| p.title()).collect()
}

#[test]
fn test_relevance_score_direct_and_synonym() {
    let q = tokenize("black leather belt");
    assert_eq!(relevance_score(&q, "Brown Leather Strap"), 2);
    assert_eq!(relevance_score(&q, "Black Leather Belt"), 3);
    assert_eq!(relevance_score(&q, "Steel Bottle"), 0);
}

#[test]
fn test_relevance_score_ignores_single_chars() {
    let q = tokenize("a b cotton");
    assert_eq!(relevance_score(&q, "A B Cotton"), 1);
}

#[test]
fn test_conflict_rule_excludes_shirt_for_hoodie() {
    let pool = products(&["Classic Formal Shirt for Men", "Grey Fleece Hoodie for Men"]);
    let out = filter_relevant_products(&pool, "Men's Cotton Hoodie Sweatshirt", RelevanceOptions::lenient());
    assert_eq!(titles(&out), vec!["Grey Fleece Hoodie for Men"]);
}

#[test]
fn test_conflict_rule_holds_in_lenient_fallback() {
    let pool = products(&["Classic Formal Shirt for Men", "Men Track Pants"]);
    let out = filter_relevant_products(&pool, "Men's Cotton Hoodie Sweatshirt", RelevanceOptions::lenient());
    assert!(!titles(&out).contains(&"Classic Formal Shirt for Men"));
    assert_eq!(titles(&out), vec!["Men Track Pants"]);
}

#[test]
fn test_strict_guard_unmet_is_empty() {
    let pool = products(&["Red Silk Saree", "Cotton Kurti"]);
    let out = filter_relevant_products(&pool, "Blue Denim Jacket Slim", RelevanceOptions::strict());
    assert!(out.is_empty());
}

#[test]
fn test_strict_threshold_unmet_is_empty() {
    let pool = products(&["Steel Lunch Box", "Plastic Tiffin"]);
    let base = "Steel Water Bottle 1 Litre";

    let strict = filter_relevant_products(&pool, base, RelevanceOptions::strict());
    assert!(strict.is_empty());

    let lenient = filter_relevant_products(&pool, base, RelevanceOptions::lenient());
    assert_eq!(titles(&lenient), vec!["Steel Lunch Box", "Plastic Tiffin"]);
}

#[test]
fn test_ranked_best_first() {
    let pool = products(&[
        "Steel Lunch Box",
        "Insulated Steel Water Bottle",
        "Water Bottle Cover",
    ]);
    let out = filter_relevant_products(&pool, "Steel Water Bottle 1 Litre", RelevanceOptions::lenient());
    assert_eq!(titles(&out), vec!["Insulated Steel Water Bottle", "Water Bottle Cover"]);
}

#[test]
fn test_empty_query_tokens() {
    let pool = products(&["Anything"]);
    assert!(filter_relevant_products(&pool, "new combo", RelevanceOptions::strict()).is_empty());
    assert_eq!(filter_relevant_products(&pool, "new combo", RelevanceOptions::lenient()).len(), 1);
}

#[test]
fn test_result_capped() {
    let many: Vec<String> = (0..20).map(|i| format!("Cotton Kurti Style {i}")).collect();
    let refs: Vec<&str> = many.iter().map(String::as_str).collect();
    let pool = products(&refs);
    let out = filter_relevant_products(&pool, "Rayon Cotton Kurti", RelevanceOptions::lenient());
    assert_eq!(out.len(), MAX_RELEVANT);
    assert_eq!(out[0].title(), "Cotton Kurti Style 0");
}

#[test]
fn test_empty_pool() {
    let pool: Vec<NormalizedProduct> = Vec::new();
    assert!(filter_relevant_products(&pool, "Kurti", RelevanceOptions::lenient()).is_empty());
}

#[test]
fn test_gender_permissiveness() {
    let pool = products(&["Premium Leather Wallet", "Men's Leather Wallet"]);
    let out = filter_by_category_and_gender(&pool, Category::Unknown, Gender::Female);
    assert_eq!(titles(&out), vec!["Premium Leather Wallet"]);
}

#[test]
fn test_category_filter_accessories_ignores_gender() {
    let pool = products(&["Men's Leather Wallet", "Steel Bottle"]);
    let out = filter_by_category_and_gender(&pool, Category::Accessories, Gender::Female);
    assert_eq!(titles(&out), vec!["Men's Leather Wallet"]);
}

#[test]
fn test_category_filter_unknown_unisex_keeps_all() {
    let pool = products(&["A", "B"]);
    assert_eq!(filter_by_category_and_gender(&pool, Category::Unknown, Gender::Unisex).len(), 2);
}

#[test]
fn test_category_filter_gender_empties() {
    let pool = products(&["Men Slim Jeans", "Boys Denim Jeans"]);
    assert!(filter_by_category_and_gender(&pool, Category::Clothing, Gender::Female).is_empty());
}

#[test]
fn test_women_ethnic_requires_garment() {
    let pool = products(&["Printed Dupatta", "Women Cotton Anarkali"]);
    let out = filter_by_category_and_gender(&pool, Category::WomenEthnic, Gender::Female);
    assert_eq!(titles(&out), vec!["Women Cotton Anarkali"]);
}

#[test]
fn test_end_to_end_kurti() {
    use crate::classifier::detect_category_and_gender;
    use crate::query::make_smart_query;

    let title = "Women Floral Printed Kurti";
    let breadcrumb = "Home > Women > Ethnic > Kurtis";

    let c = detect_category_and_gender(title, breadcrumb);
    assert_eq!(c.category, Category::WomenEthnic);
    assert_eq!(c.gender, Gender::Female);

    let query = make_smart_query(title, breadcrumb, c.category, c.gender);
    let words: Vec<&str> = query.split(' ').collect();
    assert!(words.contains(&"women"));
    assert!(words.contains(&"kurti"));

    let pool = products(&["Men's Formal Kurta", "Women Floral Kurti Set", "Leather Belt"]);
    let out = filter_by_category_and_gender(&pool, c.category, c.gender);
    assert_eq!(titles(&out), vec!["Women Floral Kurti Set"]);
}
