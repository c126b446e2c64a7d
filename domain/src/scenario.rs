//! Pre-built demo scenarios served to the dashboard

use crate::research::mode::ResearchMode;
use serde::Serialize;

/// A canned query the dashboard offers as a one-click demo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoScenario {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub query: &'static str,
    pub mode: ResearchMode,
    pub expected_time: &'static str,
    pub agents: &'static [&'static str],
    pub highlights: &'static [&'static str],
}

const SCENARIOS: &[DemoScenario] = &[
    DemoScenario {
        id: "quantum",
        title: "What is quantum computing?",
        description: "Simple query demonstration (30 seconds)",
        query: "What is quantum computing?",
        mode: ResearchMode::Simple,
        expected_time: "~30s",
        agents: &["Web Harvester"],
        highlights: &["Basic single-agent research", "Fast response", "Clear explanation"],
    },
    DemoScenario {
        id: "mrna",
        title: "mRNA vaccine mechanisms",
        description: "Complex multi-agent analysis (2 minutes)",
        query: "Analyze mRNA vaccine mechanisms, efficacy data, and therapeutic applications",
        mode: ResearchMode::Expert,
        expected_time: "~2min",
        agents: &["Domain Specialist", "Web Harvester", "Fact Validator"],
        highlights: &["Multi-agent collaboration", "Expert domain analysis", "Fact validation"],
    },
    DemoScenario {
        id: "ai_safety",
        title: "AI safety developments",
        description: "Current events research with web search",
        query: "What are the latest developments in AI safety and alignment research?",
        mode: ResearchMode::Auto,
        expected_time: "~1min",
        agents: &["Web Harvester", "Domain Specialist"],
        highlights: &["Real-time web search", "Current information", "Domain expertise"],
    },
    DemoScenario {
        id: "local_ai",
        title: "Local AI deployment",
        description: "Technical analysis with quality audit",
        query: "How to deploy enterprise AI systems locally with quantized models?",
        mode: ResearchMode::Expert,
        expected_time: "~90s",
        agents: &["Domain Specialist", "Web Harvester", "Quality Auditor"],
        highlights: &["Technical depth", "Practical guidance", "Quality assessment"],
    },
];

impl DemoScenario {
    pub fn catalog() -> &'static [DemoScenario] {
        SCENARIOS
    }

    pub fn find(id: &str) -> Option<&'static DemoScenario> {
        SCENARIOS.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        let mut ids: Vec<_> = DemoScenario::catalog().iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_scenario_json_shape() {
        let json = serde_json::to_value(DemoScenario::find("quantum").unwrap()).unwrap();
        assert_eq!(json["mode"], "simple");
        assert_eq!(json["agents"], serde_json::json!(["Web Harvester"]));
        assert!(json["highlights"].is_array());
    }
}
