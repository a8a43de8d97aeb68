//! `query` subcommand: local classification and search queries.

use greenchoice_config::Config;
use greenchoice_matching::{build_clean_query, detect_category_and_gender, make_smart_query};
use greenchoice_protocols::QueryStyle;
use serde_json::json;

use crate::cli::OutputFormat;

pub fn handle_query_command(
    config: &Config,
    title: &str,
    breadcrumb: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let classification = detect_category_and_gender(title, breadcrumb);
    let smart = make_smart_query(title, breadcrumb, classification.category, classification.gender);
    let clean = build_clean_query(&smart);

    let site_urls: Vec<(String, String)> = config
        .sites
        .iter()
        .map(|site| {
            let query = match site.query_style {
                QueryStyle::Smart => smart.as_str(),
                QueryStyle::Clean => clean.as_str(),
            };
            (site.name.clone(), site.search_url(query))
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let sites: Vec<_> = site_urls
                .iter()
                .map(|(name, url)| json!({"site": name, "url": url}))
                .collect();
            let out = json!({
                "category": classification.category,
                "gender": classification.gender,
                "smartQuery": smart,
                "cleanQuery": clean,
                "sites": sites,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("Category:     {}", classification.category);
            println!("Gender:       {}", classification.gender);
            println!("Smart query:  {}", smart);
            println!("Clean query:  {}", clean);
            println!();
            for (name, url) in &site_urls {
                println!("{:<10} {}", name, url);
            }
        }
    }

    Ok(())
}
