//! Category membership listing.
//!
//! Walks `list=categorymembers` page by page, following `cmcontinue` until
//! the API stops returning one. Each page is handed to a callback as soon as
//! it arrives so callers can persist partial progress.

use crate::api::{CommonsClient, Throttle, Transport};
use crate::error::ScrapeError;
use anyhow::Result;
use shared::config::CommonsConfig;
use tracing::{info, warn};

/// Collects every file title in one category
#[derive(Debug, Clone)]
pub struct CategoryPaginator {
    category: String,
    page_size: u32,
    /// Consecutive unusable responses tolerated before giving up
    max_malformed_retries: u32,
    pages_fetched: usize,
}

impl CategoryPaginator {
    pub fn new(category: impl Into<String>, page_size: u32, max_malformed_retries: u32) -> Self {
        Self {
            category: category.into(),
            page_size,
            max_malformed_retries,
            pages_fetched: 0,
        }
    }

    pub fn from_config(config: &CommonsConfig) -> Self {
        Self::new(
            config.category.clone(),
            config.page_size,
            config.max_malformed_retries,
        )
    }

    /// Fetch all titles without a per-page callback
    pub async fn fetch_all_titles<T: Transport, R: Throttle>(
        &mut self,
        client: &mut CommonsClient<T, R>,
    ) -> Result<Vec<String>> {
        self.fetch_all_titles_with(client, |_| Ok(())).await
    }

    /// Fetch all titles, calling `on_page` with each page's titles in order
    ///
    /// A response without `query.categorymembers` (a `maxlag` error, for
    /// instance) is retried with the same cursor; more than
    /// `max_malformed_retries` of them in a row aborts the listing.
    pub async fn fetch_all_titles_with<T, R, F>(
        &mut self,
        client: &mut CommonsClient<T, R>,
        mut on_page: F,
    ) -> Result<Vec<String>>
    where
        T: Transport,
        R: Throttle,
        F: FnMut(&[String]) -> Result<()>,
    {
        info!(category = %self.category, "Listing category members");

        let mut titles = Vec::new();
        let mut cursor: Option<String> = None;
        let mut malformed = 0u32;
        self.pages_fetched = 0;

        loop {
            info!(count = titles.len(), "files gathered");

            let response = client
                .category_members(&self.category, self.page_size, cursor.as_deref())
                .await?;
            let api_error = response.error.clone();
            let (members, next_cursor) = response.into_parts();

            let Some(members) = members else {
                malformed += 1;
                warn!(
                    attempt = malformed,
                    cursor = ?cursor,
                    error = ?api_error,
                    "no categorymembers in listing response"
                );
                if malformed > self.max_malformed_retries {
                    return Err(ScrapeError::MalformedListing { attempts: malformed }.into());
                }
                continue;
            };
            malformed = 0;
            self.pages_fetched += 1;

            let page: Vec<String> = members.into_iter().map(|member| member.title).collect();
            on_page(&page)?;
            titles.extend(page);

            match next_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    info!(
                        count = titles.len(),
                        pages = self.pages_fetched,
                        "no continue, listing complete"
                    );
                    break;
                }
            }
        }

        Ok(titles)
    }

    /// Pages successfully fetched by the last listing
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{param, CountingThrottle, ScriptedTransport};
    use serde_json::{json, Value};

    fn client(transport: ScriptedTransport) -> CommonsClient<ScriptedTransport, CountingThrottle> {
        CommonsClient::new(transport, CountingThrottle::default(), 5)
    }

    /// Serves `total` members in pages of `page_size`, using the next offset as cursor
    fn paged_category(total: usize, page_size: usize) -> ScriptedTransport {
        ScriptedTransport::json(move |request| {
            let start: usize = param(request, "cmcontinue")
                .map(|c| c.parse().unwrap())
                .unwrap_or(0);
            let end = (start + page_size).min(total);
            let members: Vec<Value> = (start..end)
                .map(|i| json!({"ns": 6, "title": format!("File:{i}.jpg")}))
                .collect();

            let mut body = json!({"batchcomplete": "", "query": {"categorymembers": members}});
            if end < total {
                body["continue"] = json!({"cmcontinue": end.to_string(), "continue": "-||"});
            }
            body
        })
    }

    #[tokio::test]
    async fn test_single_page_without_continue_terminates() -> Result<()> {
        let mut client = client(paged_category(3, 500));
        let mut paginator = CategoryPaginator::new("Category:Test", 500, 3);

        let titles = paginator.fetch_all_titles(&mut client).await?;

        assert_eq!(titles, vec!["File:0.jpg", "File:1.jpg", "File:2.jpg"]);
        assert_eq!(client.transport().requests().len(), 1);
        assert_eq!(paginator.pages_fetched(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_1200_members_take_three_pages() -> Result<()> {
        let mut client = client(paged_category(1200, 500));
        let mut paginator = CategoryPaginator::new("Category:Test", 500, 3);

        let mut page_sizes = Vec::new();
        let titles = paginator
            .fetch_all_titles_with(&mut client, |page| {
                page_sizes.push(page.len());
                Ok(())
            })
            .await?;

        assert_eq!(titles.len(), 1200);
        assert_eq!(titles[0], "File:0.jpg");
        assert_eq!(titles[1199], "File:1199.jpg");
        assert_eq!(page_sizes, vec![500, 500, 200]);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(param(&requests[0], "cmcontinue"), None);
        assert_eq!(param(&requests[1], "cmcontinue"), Some("500"));
        assert_eq!(param(&requests[2], "cmcontinue"), Some("1000"));
        assert!(requests.iter().all(|r| param(r, "cmlimit") == Some("500")));
        assert_eq!(client.throttle().acquired, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_response_retries_same_cursor() -> Result<()> {
        let mut calls = 0;
        let transport = ScriptedTransport::json(move |request| {
            calls += 1;
            match (calls, param(request, "cmcontinue")) {
                (1, None) => json!({
                    "continue": {"cmcontinue": "b"},
                    "query": {"categorymembers": [{"title": "File:A.jpg"}]}
                }),
                (2, Some("b")) => json!({"error": {"code": "maxlag", "info": "lagged"}}),
                (3, Some("b")) => json!({"query": {"categorymembers": [{"title": "File:B.jpg"}]}}),
                other => panic!("unexpected request {other:?}"),
            }
        });
        let mut client = client(transport);
        let mut paginator = CategoryPaginator::new("Category:Test", 500, 3);

        let titles = paginator.fetch_all_titles(&mut client).await?;

        assert_eq!(titles, vec!["File:A.jpg", "File:B.jpg"]);
        assert_eq!(paginator.pages_fetched(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_persistent_malformed_responses_give_up() {
        let transport = ScriptedTransport::json(|_| json!({"batchcomplete": ""}));
        let mut client = client(transport);
        let mut paginator = CategoryPaginator::new("Category:Test", 500, 3);

        let err = paginator.fetch_all_titles(&mut client).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::MalformedListing { attempts: 4 })
        ));
        assert_eq!(client.transport().requests().len(), 4);
    }

    #[tokio::test]
    async fn test_page_callback_error_aborts() {
        let mut client = client(paged_category(1200, 500));
        let mut paginator = CategoryPaginator::new("Category:Test", 500, 3);

        let result = paginator
            .fetch_all_titles_with(&mut client, |_| anyhow::bail!("disk full"))
            .await;

        assert!(result.is_err());
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let transport = ScriptedTransport::new(|_| anyhow::bail!("connection reset"));
        let mut client = client(transport);
        let mut paginator = CategoryPaginator::new("Category:Test", 500, 3);

        assert!(paginator.fetch_all_titles(&mut client).await.is_err());
        assert_eq!(client.transport().requests().len(), 1);
    }
}
