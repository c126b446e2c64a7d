//! Research run state machine

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// State of a research run.
///
/// `Analyzing -> ParallelResearch -> [Validating] -> Synthesizing -> Complete`,
/// with `Failed` reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Analyzing,
    ParallelResearch,
    Validating,
    Synthesizing,
    Complete,
    Failed,
}

impl RunState {
    pub fn as_str(&self) -> &str {
        match self {
            RunState::Analyzing => "analyzing",
            RunState::ParallelResearch => "parallel_research",
            RunState::Validating => "validating",
            RunState::Synthesizing => "synthesizing",
            RunState::Complete => "complete",
            RunState::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            RunState::Analyzing => "Query Analysis",
            RunState::ParallelResearch => "Parallel Research",
            RunState::Validating => "Validation",
            RunState::Synthesizing => "Synthesis",
            RunState::Complete => "Complete",
            RunState::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Complete | RunState::Failed)
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Analyzing, ParallelResearch)
            | (ParallelResearch, Validating)
            | (ParallelResearch, Synthesizing)
            | (Validating, Synthesizing)
            | (Synthesizing, Complete) => true,
            _ => false,
        }
    }

    /// Checked transition
    pub fn transition(self, next: RunState) -> Result<RunState, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::IllegalTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
