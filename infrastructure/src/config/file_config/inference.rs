//! Inference runtime configuration from TOML (`[inference]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw inference runtime configuration from TOML
///
/// `host` may also come from the `OLLAMA_HOST` environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInferenceConfig {
    /// Base URL of the Ollama runtime
    pub host: String,
    /// Seconds without a streamed chunk before a call is abandoned
    pub idle_timeout_secs: u64,
    /// Seconds allowed for establishing the TCP connection
    pub connect_timeout_secs: u64,
    /// Upper bound on generated tokens per call
    pub max_tokens: u32,
}

impl Default for FileInferenceConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:11434".to_string(),
            idle_timeout_secs: 120,
            connect_timeout_secs: 5,
            max_tokens: 1000,
        }
    }
}

impl FileInferenceConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Host with a scheme, as `OLLAMA_HOST` is often given as bare `host:port`
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }
}
