//! Research modes

use crate::agent::role::AgentRole;
use crate::research::analysis::QueryAnalysis;
use serde::{Deserialize, Serialize};

/// Strategy selecting which agents a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchMode {
    /// Agent subset inferred from the query analysis
    #[default]
    Auto,
    /// Every research agent, validation and a quality audit
    Expert,
    /// Web research only
    Simple,
}

impl ResearchMode {
    pub fn as_str(&self) -> &str {
        match self {
            ResearchMode::Auto => "auto",
            ResearchMode::Expert => "expert",
            ResearchMode::Simple => "simple",
        }
    }

    /// Parse a client-supplied mode; unknown or missing values mean `auto`
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("expert") => ResearchMode::Expert,
            Some("simple") => ResearchMode::Simple,
            _ => ResearchMode::Auto,
        }
    }

    /// Agents for the parallel research phase, in registry order
    pub fn research_roles(&self, analysis: &QueryAnalysis) -> Vec<AgentRole> {
        match self {
            ResearchMode::Simple => vec![AgentRole::Researcher],
            ResearchMode::Expert => vec![AgentRole::Specialist, AgentRole::Researcher],
            ResearchMode::Auto => {
                let mut roles = vec![AgentRole::Specialist];
                if analysis.web_recommended {
                    roles.push(AgentRole::Researcher);
                }
                roles
            }
        }
    }

    pub fn runs_validation(&self) -> bool {
        !matches!(self, ResearchMode::Simple)
    }

    pub fn runs_audit(&self) -> bool {
        matches!(self, ResearchMode::Expert)
    }
}

impl std::fmt::Display for ResearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::Query;

    fn analysis(text: &str) -> QueryAnalysis {
        QueryAnalysis::heuristic(&Query::try_new(text).unwrap())
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(ResearchMode::parse_lenient(Some("Expert")), ResearchMode::Expert);
        assert_eq!(ResearchMode::parse_lenient(Some("simple")), ResearchMode::Simple);
        assert_eq!(ResearchMode::parse_lenient(Some("turbo")), ResearchMode::Auto);
        assert_eq!(ResearchMode::parse_lenient(None), ResearchMode::Auto);
    }

    #[test]
    fn test_fixed_presets() {
        let a = analysis("What is quantum computing?");
        assert_eq!(ResearchMode::Simple.research_roles(&a), vec![AgentRole::Researcher]);
        assert_eq!(
            ResearchMode::Expert.research_roles(&a),
            vec![AgentRole::Specialist, AgentRole::Researcher]
        );
        assert!(!ResearchMode::Simple.runs_validation());
        assert!(ResearchMode::Expert.runs_audit());
        assert!(!ResearchMode::Auto.runs_audit());
    }

    #[test]
    fn test_auto_adds_web_for_current_information() {
        let current = analysis("Latest AI safety developments");
        assert_eq!(
            ResearchMode::Auto.research_roles(&current),
            vec![AgentRole::Specialist, AgentRole::Researcher]
        );

        let timeless = analysis("Explain photosynthesis");
        assert_eq!(ResearchMode::Auto.research_roles(&timeless), vec![AgentRole::Specialist]);
    }
}
