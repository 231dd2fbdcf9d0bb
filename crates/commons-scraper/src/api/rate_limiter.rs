//! Request pacing for the Commons API.
//!
//! The default limiter sleeps a fixed delay before every request and a
//! second fixed delay when the server reports replication lag. An optional
//! per-minute ceiling caps bursts if the fixed delay is configured low.

use shared::config::RateLimitConfig;
use std::time::{Duration, Instant};
use tokio::time::sleep;

const WINDOW: Duration = Duration::from_secs(60);

/// Pacing policy consulted around every API request
#[allow(async_fn_in_trait)]
pub trait Throttle {
    /// Wait until the next request may be sent
    async fn acquire(&mut self);

    /// Wait after a response signalled replication lag
    async fn back_off(&mut self);
}

/// Fixed-delay rate limiter with an optional per-minute ceiling
#[derive(Debug)]
pub struct RateLimiter {
    /// Sleep before every request
    request_delay: Duration,
    /// Extra sleep after a lag signal
    lag_delay: Duration,
    /// Maximum requests per rolling minute
    max_per_minute: Option<u32>,
    /// Request timestamps in the last minute
    recent_requests: Vec<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(request_delay: Duration, lag_delay: Duration, max_per_minute: Option<u32>) -> Self {
        Self {
            request_delay,
            lag_delay,
            max_per_minute,
            recent_requests: Vec::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            Duration::from_millis(config.request_delay_ms),
            Duration::from_millis(config.lag_delay_ms),
            config.requests_per_minute,
        )
    }

    /// How long to wait at `now` before the per-minute ceiling allows another request
    fn window_wait(&mut self, now: Instant) -> Option<Duration> {
        let max = self.max_per_minute? as usize;

        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < WINDOW);

        if self.recent_requests.len() < max {
            return None;
        }

        // oldest request must leave the window first
        let oldest = *self.recent_requests.first()?;
        Some(WINDOW.saturating_sub(now.duration_since(oldest)))
    }

    /// Get the current number of requests in the last minute
    pub fn current_minute_count(&mut self) -> usize {
        let now = Instant::now();
        self.recent_requests
            .retain(|&timestamp| now.duration_since(timestamp) < WINDOW);
        self.recent_requests.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

impl Throttle for RateLimiter {
    async fn acquire(&mut self) {
        if let Some(wait_time) = self.window_wait(Instant::now()) {
            tracing::debug!(
                wait_ms = wait_time.as_millis(),
                "Rate limit: waiting for per-minute limit"
            );
            sleep(wait_time).await;
        }

        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }

        if self.max_per_minute.is_some() {
            self.recent_requests.push(Instant::now());
        }
    }

    async fn back_off(&mut self) {
        tracing::debug!(
            wait_ms = self.lag_delay.as_millis(),
            "Rate limit: backing off after lag signal"
        );
        sleep(self.lag_delay).await;
    }
}

/// Throttle that never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct Unthrottled;

impl Throttle for Unthrottled {
    async fn acquire(&mut self) {}

    async fn back_off(&mut self) {}
}
