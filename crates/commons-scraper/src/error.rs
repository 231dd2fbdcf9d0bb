//! Failures specific to scraping Commons.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("no categorymembers in {attempts} consecutive listing responses")]
    MalformedListing { attempts: u32 },

    #[error("imageinfo response has no pages")]
    MissingPages,

    #[error("no URL resolved for {0}")]
    MissingTitle(String),

    #[error("feed has no items")]
    EmptyFeed,

    #[error("last feed item has no description")]
    MissingDescription,

    #[error("no file link in feed description")]
    MissingFileLink,

    #[error("file link {0} is not valid UTF-8 once decoded")]
    InvalidTitleEncoding(String),
}

impl From<crate::api::ApiError> for ScrapeError {
    fn from(error: crate::api::ApiError) -> Self {
        Self::Api {
            code: error.code,
            info: error.info,
        }
    }
}
