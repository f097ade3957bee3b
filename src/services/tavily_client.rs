use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{domain::SearchResult, error::SearchFailure};

pub const MAX_SEARCH_RESULTS: usize = 3;

/// Looks people up on the web. `full_name` is never blank, the enricher
/// filters those out before calling.
#[async_trait]
pub trait ProfileSearcher: Send + Sync {
    async fn search(&self, full_name: &str) -> Result<Vec<SearchResult>, SearchFailure>;
}

pub struct TavilyClient {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    api_key: &'a str,
    query: String,
    n_results: usize,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl TavilyClient {
    pub fn new(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(TavilyClient {
            client,
            api_key,
            url: format!("{}/search", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ProfileSearcher for TavilyClient {
    async fn search(&self, full_name: &str) -> Result<Vec<SearchResult>, SearchFailure> {
        let query = build_profile_search_query(full_name);
        log::debug!("Searching profiles with query: {}", query);

        let res = self
            .client
            .post(&self.url)
            .json(&SearchQuery {
                api_key: &self.api_key,
                query,
                n_results: MAX_SEARCH_RESULTS,
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SearchFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await?;
        let mut results = serde_json::from_str::<ApiResponse>(&body)?.results;
        results.truncate(MAX_SEARCH_RESULTS);

        log::info!("Found {} search results for {}", results.len(), full_name);

        Ok(results)
    }
}

pub fn build_profile_search_query(full_name: &str) -> String {
    format!(r#""{}" site:linkedin.com/in"#, full_name.trim())
}
