//! Batched title to direct-URL resolution.
//!
//! The API groups `query.pages` by internal page id, so results are always
//! keyed by the requested title and never matched up by position.

use crate::api::{CommonsClient, Throttle, Transport};
use crate::error::ScrapeError;
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info};

/// Titles per imageinfo request, kept well under the API's URL length limits
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Title to direct URL mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedUrls {
    urls: HashMap<String, String>,
}

impl ResolvedUrls {
    /// URL for `title`; a title the API did not resolve is an error
    pub fn get(&self, title: &str) -> Result<&str, ScrapeError> {
        self.urls
            .get(title)
            .map(String::as_str)
            .ok_or_else(|| ScrapeError::MissingTitle(title.to_string()))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn extend(&mut self, other: ResolvedUrls) {
        self.urls.extend(other.urls);
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.urls
    }
}

/// Resolves titles to direct URLs in fixed-size batches
#[derive(Debug, Clone, Copy)]
pub struct BatchResolver {
    batch_size: usize,
}

impl Default for BatchResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl BatchResolver {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Split `titles` into request-sized batches
    pub fn batches<'a>(&self, titles: &'a [String]) -> std::slice::Chunks<'a, String> {
        titles.chunks(self.batch_size)
    }

    /// Resolve every title, one request per batch
    pub async fn resolve<T: Transport, R: Throttle>(
        &self,
        client: &mut CommonsClient<T, R>,
        titles: &[String],
    ) -> Result<ResolvedUrls> {
        let mut resolved = ResolvedUrls::default();

        for (index, batch) in self.batches(titles).enumerate() {
            info!(
                resolved = index * self.batch_size,
                total = titles.len(),
                "got URLs for files"
            );
            resolved.extend(self.resolve_batch(client, batch).await?);
        }

        Ok(resolved)
    }

    /// Resolve one batch with a single request
    ///
    /// Titles the API normalised (e.g. underscores to spaces) are keyed by
    /// the spelling the caller asked for. Pages without imageinfo are left
    /// out, so looking them up fails.
    pub async fn resolve_batch<T: Transport, R: Throttle>(
        &self,
        client: &mut CommonsClient<T, R>,
        batch: &[String],
    ) -> Result<ResolvedUrls> {
        let response = client.image_info(batch).await?;

        if let Some(error) = response.error {
            return Err(ScrapeError::from(error).into());
        }
        let query = response.query.ok_or(ScrapeError::MissingPages)?;
        let pages = query.pages.ok_or(ScrapeError::MissingPages)?;

        let by_title: HashMap<&str, &str> = pages
            .values()
            .filter_map(|page| page.url().map(|url| (page.title.as_str(), url)))
            .collect();
        let normalized: HashMap<&str, &str> = query
            .normalized
            .iter()
            .map(|n| (n.from.as_str(), n.to.as_str()))
            .collect();

        let mut urls = HashMap::with_capacity(batch.len());
        for title in batch {
            let key = normalized.get(title.as_str()).copied().unwrap_or(title.as_str());
            match by_title.get(key) {
                Some(url) => {
                    urls.insert(title.clone(), url.to_string());
                }
                None => debug!(title = %title, "No imageinfo for title"),
            }
        }

        Ok(ResolvedUrls { urls })
    }
}
