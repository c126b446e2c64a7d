//! Orchestrator configuration from TOML (`[orchestrator]` section)

use localmind_application::OrchestratorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Ask the Principal's model for a query analysis
    pub model_analysis: bool,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub finding_excerpt_chars: usize,
    pub validation_excerpt_chars: usize,
    pub audit_excerpt_chars: usize,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let defaults = OrchestratorConfig::default();
        Self {
            model_analysis: defaults.model_analysis,
            max_retries: defaults.max_retries,
            retry_backoff_ms: defaults.retry_backoff.as_millis() as u64,
            finding_excerpt_chars: defaults.finding_excerpt_chars,
            validation_excerpt_chars: defaults.validation_excerpt_chars,
            audit_excerpt_chars: defaults.audit_excerpt_chars,
        }
    }
}

impl FileOrchestratorConfig {
    /// Convert to the application config; `max_tokens` comes from `[inference]`
    pub fn to_orchestrator_config(&self, max_tokens: u32) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_model_analysis(self.model_analysis)
            .with_max_retries(self.max_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
            .with_max_tokens(max_tokens)
            .with_finding_excerpt_chars(self.finding_excerpt_chars)
            .with_validation_excerpt_chars(self.validation_excerpt_chars)
            .with_audit_excerpt_chars(self.audit_excerpt_chars)
    }
}
