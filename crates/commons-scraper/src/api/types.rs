//! MediaWiki API response types.
//!
//! Only the fields the scraper reads are modelled; everything else in the
//! JSON is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error object returned in place of a result, e.g. for `maxlag`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub info: String,
}

/// `list=categorymembers` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryMembersResponse {
    #[serde(default)]
    pub query: Option<CategoryMembersQuery>,
    #[serde(rename = "continue", default)]
    pub continuation: Option<Continuation>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryMembersQuery {
    #[serde(default)]
    pub categorymembers: Option<Vec<CategoryMember>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryMember {
    pub title: String,
}

/// Continuation block; only `cmcontinue` is used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Continuation {
    #[serde(default)]
    pub cmcontinue: Option<String>,
}

impl CategoryMembersResponse {
    /// Split into the page's members (if the expected shape is present) and the next cursor
    pub fn into_parts(self) -> (Option<Vec<CategoryMember>>, Option<String>) {
        let members = self.query.and_then(|q| q.categorymembers);
        let cursor = self.continuation.and_then(|c| c.cmcontinue);
        (members, cursor)
    }
}

/// `prop=imageinfo&iiprop=url` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageInfoResponse {
    #[serde(default)]
    pub query: Option<ImageInfoQuery>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageInfoQuery {
    /// Titles the API rewrote before lookup
    #[serde(default)]
    pub normalized: Vec<Normalization>,
    /// Keyed by internal page id (negative for missing pages)
    #[serde(default)]
    pub pages: Option<HashMap<String, ImagePage>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Normalization {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePage {
    pub title: String,
    #[serde(default)]
    pub imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageInfo {
    pub url: String,
    #[serde(default)]
    pub descriptionurl: Option<String>,
}

impl ImagePage {
    /// Direct URL from the first imageinfo entry
    pub fn url(&self) -> Option<&str> {
        self.imageinfo.first().map(|info| info.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_members_with_continue() -> anyhow::Result<()> {
        let body = r#"{
            "batchcomplete": "",
            "continue": {"cmcontinue": "file|4142|123", "continue": "-||"},
            "query": {"categorymembers": [
                {"ns": 6, "title": "File:A.jpg"},
                {"ns": 6, "title": "File:B.jpg"}
            ]}
        }"#;
        let response: CategoryMembersResponse = serde_json::from_str(body)?;
        let (members, cursor) = response.into_parts();

        let titles: Vec<_> = members.unwrap_or_default().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["File:A.jpg", "File:B.jpg"]);
        assert_eq!(cursor.as_deref(), Some("file|4142|123"));
        Ok(())
    }

    #[test]
    fn test_maxlag_error_has_no_members() -> anyhow::Result<()> {
        let body = r#"{"error": {"code": "maxlag", "info": "Waiting for a database server: 6 seconds lagged."}}"#;
        let response: CategoryMembersResponse = serde_json::from_str(body)?;

        assert_eq!(response.error.as_ref().map(|e| e.code.as_str()), Some("maxlag"));
        let (members, cursor) = response.into_parts();
        assert!(members.is_none());
        assert!(cursor.is_none());
        Ok(())
    }

    #[test]
    fn test_image_info_pages() -> anyhow::Result<()> {
        let body = r#"{
            "query": {
                "normalized": [{"from": "File:A_b.jpg", "to": "File:A b.jpg"}],
                "pages": {
                    "101": {"pageid": 101, "ns": 6, "title": "File:A b.jpg", "imagerepository": "local",
                            "imageinfo": [{"url": "https://upload.wikimedia.org/a.jpg",
                                           "descriptionurl": "https://commons.wikimedia.org/wiki/File:A_b.jpg"}]},
                    "-1": {"ns": 6, "title": "File:Gone.jpg", "missing": ""}
                }
            }
        }"#;
        let response: ImageInfoResponse = serde_json::from_str(body)?;
        let query = response.query.unwrap_or_default();

        assert_eq!(query.normalized.len(), 1);
        let pages = query.pages.unwrap_or_default();
        assert_eq!(pages["101"].url(), Some("https://upload.wikimedia.org/a.jpg"));
        assert_eq!(pages["-1"].url(), None);
        Ok(())
    }
}
