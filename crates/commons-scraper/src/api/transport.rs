//! HTTP transport for `api.php` requests.

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

/// Header the API sets when its database replicas are lagging
pub const DATABASE_LAG_HEADER: &str = "x-database-lag";

/// Raw reply from one API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    /// Response body as text
    pub body: String,
    /// Whether the response signalled replication lag
    pub lagged: bool,
}

/// Issues a single GET against the API endpoint with the given query parameters
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&mut self, params: &[(&str, String)]) -> Result<ApiReply>;
}

/// Transport backed by `reqwest`
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    /// Create a transport for `endpoint`
    ///
    /// Compression is negotiated by reqwest's `gzip` feature, which sends
    /// `Accept-Encoding: gzip` and decodes the body transparently.
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("Invalid API endpoint: {}", endpoint))?;

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn get(&mut self, params: &[(&str, String)]) -> Result<ApiReply> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(params)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        let status = response.status();
        let response = response
            .error_for_status()
            .with_context(|| format!("API returned status {}", status))?;

        let lagged = response.headers().contains_key(DATABASE_LAG_HEADER);
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        debug!(status = %status, lagged = lagged, bytes = body.len(), "Received API response");

        Ok(ApiReply { body, lagged })
    }
}
