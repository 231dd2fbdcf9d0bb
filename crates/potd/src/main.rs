//! Picture of the day lookup.
//!
//! Prints `<direct url> <page link>` for today's Commons picture of the day
//! on stdout. Diagnostics go to stderr.

use anyhow::{Context, Result};
use commons_scraper::{current_picture_of_the_day, BatchResolver, CommonsClient};
use shared::{Config, LogConfig, DEFAULT_CONFIG_FILE};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_file(DEFAULT_CONFIG_FILE)
        .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE))?;

    shared::logging::init(LogConfig::from_config("potd", &config)?)?;

    let mut client = CommonsClient::from_config(&config.commons)
        .context("Failed to create Commons client")?;
    let resolver = BatchResolver::new(config.commons.batch_size);

    let potd = current_picture_of_the_day(&mut client, &resolver, &config.commons.wiki_base)
        .await
        .context("Failed to fetch picture of the day")?;

    info!(title = %potd.title, "Picture of the day resolved");
    println!("{}", potd);

    Ok(())
}
