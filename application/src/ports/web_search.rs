//! Web search port

use async_trait::async_trait;
use localmind_domain::WebResult;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WebSearchError {
    #[error("web search unavailable: {0}")]
    Unavailable(String),

    #[error("invalid web search response: {0}")]
    InvalidResponse(String),
}

/// Submit a query, receive a ranked list of results
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<WebResult>, WebSearchError>;
}
