//! Agent roles

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// The closed set of roles an agent can play in a research run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Principal agent: analyses the query and writes the final report
    Synthesizer,
    /// Domain expert analysis
    Specialist,
    /// Web research
    Researcher,
    /// Fact checking of research output
    Validator,
    /// Quality scoring of the final report
    Auditor,
}

impl AgentRole {
    /// All roles, in registry order
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Synthesizer,
        AgentRole::Specialist,
        AgentRole::Researcher,
        AgentRole::Validator,
        AgentRole::Auditor,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AgentRole::Synthesizer => "synthesizer",
            AgentRole::Specialist => "specialist",
            AgentRole::Researcher => "researcher",
            AgentRole::Validator => "validator",
            AgentRole::Auditor => "auditor",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            AgentRole::Synthesizer => "Principal Synthesizer",
            AgentRole::Specialist => "Domain Specialist",
            AgentRole::Researcher => "Web Harvester",
            AgentRole::Validator => "Fact Validator",
            AgentRole::Auditor => "Quality Auditor",
        }
    }

    pub fn default_model(&self) -> Model {
        match self {
            AgentRole::Synthesizer => Model::DeepseekR1_8b,
            AgentRole::Specialist => Model::Qwen3_8b,
            AgentRole::Researcher => Model::Qwen3_4b,
            AgentRole::Validator | AgentRole::Auditor => Model::Phi4Mini,
        }
    }

    pub fn default_temperature(&self) -> f32 {
        match self {
            AgentRole::Specialist => 0.2,
            AgentRole::Researcher => 0.3,
            AgentRole::Synthesizer | AgentRole::Validator | AgentRole::Auditor => 0.1,
        }
    }

    /// Whether this role contributes a research finding
    pub fn is_research(&self) -> bool {
        matches!(self, AgentRole::Specialist | AgentRole::Researcher)
    }

    /// Map a free-form label (as produced by a model's query analysis) to a role.
    ///
    /// Accepts the default agent names as well as looser spellings such as
    /// "web search" or "fact-check".
    pub fn from_label(label: &str) -> Option<AgentRole> {
        let label = label.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| label.contains(n));

        if has(&["synthes", "principal"]) {
            Some(AgentRole::Synthesizer)
        } else if has(&["specialist", "domain", "expert"]) {
            Some(AgentRole::Specialist)
        } else if has(&["web", "harvest", "search", "research"]) {
            Some(AgentRole::Researcher)
        } else if has(&["valid", "fact"]) {
            Some(AgentRole::Validator)
        } else if has(&["audit", "quality"]) {
            Some(AgentRole::Auditor)
        } else {
            None
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("unknown agent role: {s}"))
    }
}
