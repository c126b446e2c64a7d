//! Per-run agent status

use serde::{Deserialize, Serialize};

/// Lifecycle of one agent within one research run.
///
/// `Idle -> Pending -> Thinking -> Active -> Done`, with `Error` reachable
/// from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    /// Scheduled by a phase, not yet started
    Pending,
    /// Request sent, waiting for the first chunk
    Thinking,
    /// Streaming output
    Active,
    Done,
    Error,
}

impl AgentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Pending => "pending",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Active => "active",
            AgentStatus::Done => "done",
            AgentStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Done | AgentStatus::Error)
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
