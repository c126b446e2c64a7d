//! Brave Search API adapter

use async_trait::async_trait;
use localmind_application::{WebSearch, WebSearchError};
use localmind_domain::WebResult;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// [`WebSearch`] backed by the Brave Search web endpoint
#[derive(Debug, Clone)]
pub struct BraveSearch {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    count: u8,
    freshness: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BraveWeb {
    results: Vec<BraveResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BraveResult {
    title: String,
    url: String,
    description: String,
}

impl BraveSearch {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            count: 5,
            freshness: None,
        })
    }

    // ==================== Builder Methods ====================

    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count;
        self
    }

    /// Restrict results by age (`pd`, `pw`, `pm`, `py`); blank disables the filter
    pub fn with_freshness(mut self, freshness: impl Into<String>) -> Self {
        let freshness = freshness.into();
        self.freshness = (!freshness.trim().is_empty()).then_some(freshness);
        self
    }
}

#[async_trait]
impl WebSearch for BraveSearch {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, WebSearchError> {
        let count = self.count.to_string();
        let mut request = self
            .http
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query), ("count", count.as_str())]);
        if let Some(freshness) = &self.freshness {
            request = request.query(&[("freshness", freshness.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| WebSearchError::Unavailable(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebSearchError::Unavailable(format!(
                "status {status}: {}",
                body.trim()
            )));
        }

        let payload: BraveResponse = response
            .json()
            .await
            .map_err(|e| WebSearchError::InvalidResponse(e.to_string()))?;
        let results: Vec<WebResult> = payload
            .web
            .map(|web| web.results)
            .unwrap_or_default()
            .into_iter()
            .filter(|row| !row.url.trim().is_empty())
            .map(|row| {
                let title = if row.title.trim().is_empty() {
                    "Untitled".to_string()
                } else {
                    row.title
                };
                WebResult::new(title, row.url.trim(), row.description)
            })
            .collect();

        debug!(count = results.len(), "Brave search returned results");
        Ok(results)
    }
}
