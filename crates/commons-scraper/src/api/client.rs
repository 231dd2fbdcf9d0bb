//! Commons `api.php` client with fixed-delay pacing.

use super::rate_limiter::{RateLimiter, Throttle};
use super::transport::{HttpTransport, Transport};
use super::types::*;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use shared::config::CommonsConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the three requests the scraper makes
pub struct CommonsClient<T = HttpTransport, R = RateLimiter> {
    transport: T,
    throttle: R,
    /// `maxlag` sent with every request
    max_lag: u32,
    /// Requests issued so far
    requests: u64,
}

impl CommonsClient {
    /// Create the production client from the `[commons]` section
    pub fn from_config(config: &CommonsConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            &config.api_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_seconds),
        )?;

        Ok(Self::new(
            transport,
            RateLimiter::from_config(&config.rate_limit),
            config.max_lag,
        ))
    }
}

impl<T: Transport, R: Throttle> CommonsClient<T, R> {
    pub fn new(transport: T, throttle: R, max_lag: u32) -> Self {
        Self {
            transport,
            throttle,
            max_lag,
            requests: 0,
        }
    }

    /// Send one request, pacing before it and backing off after a lag signal
    ///
    /// The lag check happens after the request has been served, so the
    /// back-off only slows down the request that follows.
    async fn request(&mut self, mut params: Vec<(&'static str, String)>) -> Result<String> {
        params.push(("maxlag", self.max_lag.to_string()));

        self.throttle.acquire().await;
        self.requests += 1;
        debug!(request = self.requests, params = ?params, "Making API request");

        let reply = self.transport.get(&params).await?;

        if reply.lagged {
            warn!(request = self.requests, "Server reports database lag, backing off");
            self.throttle.back_off().await;
        }

        Ok(reply.body)
    }

    async fn query<D: DeserializeOwned>(&mut self, params: Vec<(&'static str, String)>) -> Result<D> {
        let body = self.request(params).await?;
        serde_json::from_str(&body).context("Failed to parse API response")
    }

    /// Fetch one page of file members of `category`
    pub async fn category_members(
        &mut self,
        category: &str,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<CategoryMembersResponse> {
        debug!(category = category, cursor = ?cursor, "Fetching category members");

        let mut params = vec![
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("list", "categorymembers".to_string()),
            ("cmlimit", limit.to_string()),
            ("cmtitle", category.to_string()),
            ("cmtype", "file".to_string()),
            ("cmprop", "title".to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cmcontinue", cursor.to_string()));
        }

        self.query(params).await
    }

    /// Fetch direct URLs for a batch of titles
    pub async fn image_info(&mut self, titles: &[String]) -> Result<ImageInfoResponse> {
        debug!(titles = titles.len(), "Fetching image info");

        let params = vec![
            ("action", "query".to_string()),
            ("format", "json".to_string()),
            ("prop", "imageinfo".to_string()),
            ("iiprop", "url".to_string()),
            ("titles", titles.join("|")),
        ];

        self.query(params).await
    }

    /// Fetch a featured-content feed as RSS
    pub async fn featured_feed(&mut self, feed: &str) -> Result<String> {
        info!(feed = feed, "Fetching featured feed");

        let params = vec![
            ("action", "featuredfeed".to_string()),
            ("feed", feed.to_string()),
            ("feedformat", "rss".to_string()),
        ];

        self.request(params).await
    }

    /// Number of requests issued so far
    pub fn request_count(&self) -> u64 {
        self.requests
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn throttle(&self) -> &R {
        &self.throttle
    }
}
