//! Picture of the day lookup.
//!
//! The `potd` featured feed is RSS whose item descriptions embed HTML. The
//! most recent item is last; its description links to the file page, and
//! that title is resolved like any other.

use crate::api::{CommonsClient, Throttle, Transport};
use crate::error::ScrapeError;
use crate::links::{decode_title, page_link};
use crate::resolver::BatchResolver;
use anyhow::{Context, Result};
use rss::Channel;
use std::fmt;
use tracing::info;

/// Featured feed name for the picture of the day
pub const POTD_FEED: &str = "potd";

/// Start of the file page href inside a feed description
const FILE_LINK_MARKER: &str = "\"/wiki/File:";

/// Today's picture of the day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureOfTheDay {
    pub title: String,
    /// Direct download URL
    pub url: String,
    /// Wiki page for the file
    pub page_link: String,
}

impl fmt::Display for PictureOfTheDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.url, self.page_link)
    }
}

/// Pull the file title out of a description's `"/wiki/File:..."` href
pub fn title_from_description(description: &str) -> Result<String, ScrapeError> {
    let marker = description
        .find(FILE_LINK_MARKER)
        .ok_or(ScrapeError::MissingFileLink)?;
    // skip `"/wiki/`, keep `File:`
    let start = marker + "\"/wiki/".len();
    let len = description[start..]
        .find('"')
        .ok_or(ScrapeError::MissingFileLink)?;

    decode_title(&description[start..start + len])
}

/// Title of the most recent item in a `potd` RSS document
pub fn title_from_feed(feed: &str) -> Result<String> {
    let channel = Channel::read_from(feed.as_bytes()).context("Failed to parse feed")?;
    let item = channel.items().last().ok_or(ScrapeError::EmptyFeed)?;
    let description = item.description().ok_or(ScrapeError::MissingDescription)?;

    Ok(title_from_description(description)?)
}

/// Fetch the feed, extract today's title and resolve its direct URL
pub async fn current_picture_of_the_day<T: Transport, R: Throttle>(
    client: &mut CommonsClient<T, R>,
    resolver: &BatchResolver,
    wiki_base: &str,
) -> Result<PictureOfTheDay> {
    let feed = client.featured_feed(POTD_FEED).await?;
    let title = title_from_feed(&feed)?;
    info!(title = %title, "Found picture of the day");

    let resolved = resolver
        .resolve_batch(client, std::slice::from_ref(&title))
        .await?;
    let url = resolved.get(&title)?.to_string();

    Ok(PictureOfTheDay {
        page_link: page_link(wiki_base, &title),
        url,
        title,
    })
}
