//! Final aggregate result of a research run

use super::analysis::QueryAnalysis;
use super::mode::ResearchMode;
use super::quality::QualityScore;
use crate::util::round_tenths;
use crate::web::WebResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One agent's contribution to the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub agent: String,
    pub content: String,
    /// `false` when the agent failed and `content` is a placeholder
    pub available: bool,
}

impl Finding {
    pub fn success(agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            content: content.into(),
            available: true,
        }
    }

    /// Explicit placeholder for an agent that produced nothing
    pub fn unavailable(agent: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        let agent = agent.into();
        Self {
            content: format!("[{agent} unavailable: {cause}]"),
            agent,
            available: false,
        }
    }
}

/// Accelerator memory in use, or system memory on hosts without a GPU
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used_gb: f64,
    pub total_gb: f64,
    pub percent: f64,
}

impl MemoryUsage {
    /// Build from mebibyte counts, rounding each figure to one decimal
    pub fn from_mib(used: f64, total: f64) -> Option<Self> {
        if total <= 0.0 || used < 0.0 {
            return None;
        }
        Some(Self {
            used_gb: round_tenths(used / 1024.0),
            total_gb: round_tenths(total / 1024.0),
            percent: round_tenths(used / total * 100.0),
        })
    }
}

/// Execution metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Wall-clock seconds, one decimal
    pub total_time: f64,
    /// Agents that were invoked, including any that failed
    pub agent_count: usize,
    pub total_tokens: u64,
    pub tokens_by_agent: BTreeMap<String, u64>,
    /// Memory in use when the run started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram_baseline: Option<MemoryUsage>,
    /// Memory in use when the run completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vram_peak: Option<MemoryUsage>,
}

/// Payload of the `complete` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub query: String,
    pub mode: ResearchMode,
    pub analysis: QueryAnalysis,
    /// Contributing agents in execution order, Principal Synthesizer last
    pub agents_used: Vec<String>,
    pub findings: Vec<Finding>,
    pub report: String,
    pub web_search_used: bool,
    pub websites: Vec<WebResult>,
    pub metrics: RunMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<QualityScore>,
    pub timestamp: String,
}

impl ResearchResult {
    pub fn finding(&self, agent: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.agent == agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_placeholder() {
        let f = Finding::unavailable("Domain Specialist", "inference timed out after 120s");
        assert!(!f.available);
        assert_eq!(
            f.content,
            "[Domain Specialist unavailable: inference timed out after 120s]"
        );
    }

    #[test]
    fn test_memory_usage_from_mib() {
        let usage = MemoryUsage::from_mib(5120.0, 12288.0).unwrap();
        assert_eq!(usage.used_gb, 5.0);
        assert_eq!(usage.total_gb, 12.0);
        assert_eq!(usage.percent, 41.7);
        assert!(MemoryUsage::from_mib(1.0, 0.0).is_none());
    }
}
