//! Wikimedia Commons featured pictures scraper.
//!
//! Lists the members of the featured pictures category, resolves each file
//! to its direct download URL, and looks up the picture of the day. Results
//! are written to flat text files.

pub mod api;
pub mod error;
pub mod links;
pub mod output;
pub mod paginator;
pub mod potd;
pub mod resolver;
pub mod scraper;

pub use api::{CommonsClient, HttpTransport, RateLimiter, Throttle, Transport, Unthrottled};
pub use error::ScrapeError;
pub use paginator::CategoryPaginator;
pub use potd::{current_picture_of_the_day, PictureOfTheDay};
pub use resolver::{BatchResolver, ResolvedUrls};
pub use scraper::{FeaturedScraper, ScraperStats};
