//! MediaWiki API client for Wikimedia Commons.
//!
//! Requests go through a [`Transport`] and are paced by a [`Throttle`], so
//! the paginator and resolver can be driven by an in-memory transport in
//! tests without real delays.

pub mod client;
pub mod rate_limiter;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::CommonsClient;
pub use rate_limiter::{RateLimiter, Throttle, Unthrottled};
pub use transport::{ApiReply, HttpTransport, Transport};
pub use types::*;
