use listing_scraper::exports;
use listing_scraper::{AppError, Config, ListingScraper};
use std::fs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FLIPPA_LINKS_FILE: &str = "flippa_links.txt";
const BUSINESS_BROKER_LISTINGS_FILE: &str = "business_broker_listings.jsonl";
const DETAILS_FILE: &str = "listing_details.json";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    // 1️⃣ Load config from environment
    let config = Config::from_env()?;
    info!(
        proxy = config.proxy_url.is_some(),
        flippa = config.scrape_flippa,
        business_broker = config.business_broker_state_url.is_some(),
        details = config.detail_urls.len(),
        output_dir = %config.output_dir.display(),
        "configuration loaded"
    );

    // 2️⃣ Scrape
    run(&config)?;

    info!("scrape run complete");
    Ok(())
}

fn run(config: &Config) -> Result<(), AppError> {
    let scraper = ListingScraper::new(config.proxy_url.clone())
        .check_egress_ip(config.check_egress_ip)
        .max_pages(config.max_pages);

    fs::create_dir_all(&config.output_dir).map_err(|e| AppError::io(&config.output_dir, e))?;

    if config.scrape_flippa {
        let result = scraper.flippa_links()?;
        let path = config.output_dir.join(FLIPPA_LINKS_FILE);
        exports::write_links(&path, &result.items)?;
        info!(
            links = result.items.len(),
            pages = result.pages_fetched,
            path = %path.display(),
            "flippa links saved"
        );
    }

    if let Some(state_url) = &config.business_broker_state_url {
        let result = scraper.business_broker_listings(state_url)?;
        let path = config.output_dir.join(BUSINESS_BROKER_LISTINGS_FILE);
        exports::write_summaries(&path, &result.items)?;
        info!(
            listings = result.items.len(),
            pages = result.pages_fetched,
            path = %path.display(),
            "business broker listings saved"
        );
    }

    if !config.detail_urls.is_empty() {
        let details = scraper.scrape_details(&config.detail_urls);
        if details.len() < config.detail_urls.len() {
            warn!(
                failed = config.detail_urls.len() - details.len(),
                "some detail pages could not be scraped"
            );
        }
        let path = config.output_dir.join(DETAILS_FILE);
        exports::write_details(&path, &details)?;
        info!(details = details.len(), path = %path.display(), "listing details saved");
    }

    Ok(())
}
