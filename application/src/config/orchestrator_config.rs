//! Orchestrator parameters: retry policy and context sizing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters controlling one research run.
///
/// These are application-layer concerns; the inference idle timeout lives with
/// the inference client adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Ask the Principal's model to analyse the query (heuristics otherwise).
    pub model_analysis: bool,
    /// Retries for an unreachable runtime, before any chunk was streamed.
    pub max_retries: u32,
    /// Base delay; attempt `n` waits `retry_backoff * 2^n`.
    pub retry_backoff: Duration,
    /// Upper bound on tokens generated per agent call.
    pub max_tokens: u32,
    /// Characters of each finding given to the synthesis.
    pub finding_excerpt_chars: usize,
    /// Characters of the combined findings given to the validator.
    pub validation_excerpt_chars: usize,
    /// Characters of the report given to the auditor.
    pub audit_excerpt_chars: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model_analysis: true,
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
            max_tokens: 1000,
            finding_excerpt_chars: 500,
            validation_excerpt_chars: 1000,
            audit_excerpt_chars: 1000,
        }
    }
}

impl OrchestratorConfig {
    /// Delay before retry number `attempt` (0-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    // ==================== Builder Methods ====================

    pub fn with_model_analysis(mut self, enabled: bool) -> Self {
        self.model_analysis = enabled;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_finding_excerpt_chars(mut self, chars: usize) -> Self {
        self.finding_excerpt_chars = chars;
        self
    }

    pub fn with_validation_excerpt_chars(mut self, chars: usize) -> Self {
        self.validation_excerpt_chars = chars;
        self
    }

    pub fn with_audit_excerpt_chars(mut self, chars: usize) -> Self {
        self.audit_excerpt_chars = chars;
        self
    }
}
