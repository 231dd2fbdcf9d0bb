//! Featured pictures scraper.
//!
//! Writes the featured category's file titles and their direct URLs to the
//! configured text files. Takes no arguments; settings come from
//! `config.toml` in the working directory when present.

use anyhow::{Context, Result};
use commons_scraper::FeaturedScraper;
use shared::{Config, LogConfig, DEFAULT_CONFIG_FILE};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_file(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE))?;

    shared::logging::init(LogConfig::from_config("featured-scraper", &config)?)?;

    info!(
        category = %config.commons.category,
        titles_file = %config.titles_path().display(),
        urls_file = %config.urls_path().display(),
        "Featured pictures scraper starting"
    );

    let mut scraper = FeaturedScraper::from_config(&config)?;
    let stats = scraper.run().await.context("Scraper failed")?;

    info!("=== Scraping Complete ===");
    info!("Pages fetched: {}", stats.pages_fetched);
    info!("Titles gathered: {}", stats.titles_gathered);
    info!("Batches resolved: {}", stats.batches_resolved);
    info!("URLs written: {}", stats.urls_written);
    info!("API requests: {}", stats.requests);

    Ok(())
}
