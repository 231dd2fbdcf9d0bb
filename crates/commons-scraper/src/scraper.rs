//! Main scraper orchestrator.
//!
//! Lists the featured category into the titles file, then reads that file
//! back and resolves every title into the URLs file.

use crate::api::{CommonsClient, HttpTransport, RateLimiter, Throttle, Transport};
use crate::output::{read_titles, TitleWriter, UrlWriter};
use crate::paginator::CategoryPaginator;
use crate::resolver::BatchResolver;
use anyhow::{Context, Result};
use shared::{Config, UrlLineFormat};
use std::path::PathBuf;
use tracing::info;

/// Statistics for one scraping run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScraperStats {
    pub pages_fetched: usize,
    pub titles_gathered: usize,
    pub batches_resolved: usize,
    pub urls_written: usize,
    pub requests: u64,
}

/// Featured pictures scraper
pub struct FeaturedScraper<T = HttpTransport, R = RateLimiter> {
    client: CommonsClient<T, R>,
    paginator: CategoryPaginator,
    resolver: BatchResolver,
    titles_path: PathBuf,
    urls_path: PathBuf,
    url_format: UrlLineFormat,
    wiki_base: String,
}

impl FeaturedScraper {
    /// Create the production scraper from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = CommonsClient::from_config(&config.commons)
            .context("Failed to create Commons client")?;
        Ok(Self::new(client, config))
    }
}

impl<T: Transport, R: Throttle> FeaturedScraper<T, R> {
    pub fn new(client: CommonsClient<T, R>, config: &Config) -> Self {
        Self {
            client,
            paginator: CategoryPaginator::from_config(&config.commons),
            resolver: BatchResolver::new(config.commons.batch_size),
            titles_path: config.titles_path(),
            urls_path: config.urls_path(),
            url_format: config.output.url_format,
            wiki_base: config.commons.wiki_base.clone(),
        }
    }

    /// Run both phases
    pub async fn run(&mut self) -> Result<ScraperStats> {
        let mut stats = ScraperStats::default();

        info!("Phase 1: Listing category members");
        self.gather_titles(&mut stats)
            .await
            .context("Failed to list category members")?;

        info!("Phase 2: Resolving image URLs");
        self.resolve_urls(&mut stats)
            .await
            .context("Failed to resolve image URLs")?;

        stats.requests = self.client.request_count();
        info!(
            pages = stats.pages_fetched,
            titles = stats.titles_gathered,
            batches = stats.batches_resolved,
            urls = stats.urls_written,
            requests = stats.requests,
            "Scrape complete"
        );

        Ok(stats)
    }

    /// Truncate the titles file and stream every category member into it
    pub async fn gather_titles(&mut self, stats: &mut ScraperStats) -> Result<()> {
        let mut writer = TitleWriter::create(&self.titles_path)?;

        let titles = self
            .paginator
            .fetch_all_titles_with(&mut self.client, |page| writer.append_page(page))
            .await?;

        stats.pages_fetched = self.paginator.pages_fetched();
        stats.titles_gathered = titles.len();
        info!(
            titles = writer.written(),
            path = %self.titles_path.display(),
            "Titles written"
        );
        Ok(())
    }

    /// Re-read the titles file and write one URL line per title, in file order
    pub async fn resolve_urls(&mut self, stats: &mut ScraperStats) -> Result<()> {
        let titles = read_titles(&self.titles_path)?;
        let mut writer = UrlWriter::create(&self.urls_path, self.url_format, &self.wiki_base)?;

        for (index, batch) in self.resolver.batches(&titles).enumerate() {
            info!(
                resolved = index * self.resolver.batch_size(),
                total = titles.len(),
                "got URLs for files"
            );

            let urls = self.resolver.resolve_batch(&mut self.client, batch).await?;
            for title in batch {
                writer.write_record(title, urls.get(title)?)?;
            }
            writer.flush()?;
            stats.batches_resolved += 1;
        }

        stats.urls_written = writer.written();
        info!(
            urls = stats.urls_written,
            path = %self.urls_path.display(),
            "URLs written"
        );
        Ok(())
    }
}
