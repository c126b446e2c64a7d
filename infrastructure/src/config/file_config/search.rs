//! Web search configuration from TOML (`[search]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default Brave Search API endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

/// Raw web search configuration from TOML
///
/// Without an `api_key` (or `BRAVE_API_KEY`) the Web Harvester works on
/// simulated results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    /// Results requested per query
    pub count: u8,
    /// Brave freshness filter (`pd`, `pw`, `pm`, `py`)
    pub freshness: String,
    pub timeout_secs: u64,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            count: 5,
            freshness: "pm".to_string(),
            timeout_secs: 5,
        }
    }
}

impl FileSearchConfig {
    /// The API key, if one is set and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_unset() {
        let config = FileSearchConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_defaults() {
        let config = FileSearchConfig::default();
        assert_eq!(config.endpoint, DEFAULT_SEARCH_ENDPOINT);
        assert_eq!(config.count, 5);
        assert_eq!(config.freshness, "pm");
    }
}
