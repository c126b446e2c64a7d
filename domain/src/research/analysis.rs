//! Query analysis produced during the ANALYZING state

use crate::agent::role::AgentRole;
use crate::core::query::Query;
use serde::{Deserialize, Serialize};

/// Queries at least this long get web research in `auto` mode
pub const LONG_QUERY_WORDS: usize = 12;

const RECENCY_KEYWORDS: &[&str] = &[
    "latest",
    "current",
    "recent",
    "recently",
    "today",
    "news",
    "trend",
    "trends",
    "developments",
    "this year",
    "this week",
    "now",
    "upcoming",
];

const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "health",
        &["vaccine", "mrna", "medical", "health", "disease", "clinical", "drug"],
    ),
    (
        "technology",
        &["ai", "software", "model", "computer", "deploy", "llm", "gpu", "network"],
    ),
    (
        "science",
        &["quantum", "physics", "chemistry", "biology", "climate", "research"],
    ),
    (
        "business",
        &["market", "finance", "business", "economy", "startup", "revenue"],
    ),
];

const ASPECT_PATTERNS: &[(&str, &str)] = &[
    ("what", "definition and explanation"),
    ("how", "process or methodology"),
    ("why", "reasoning and causation"),
    ("when", "timeline and context"),
    ("who", "people and organizations"),
    ("compare", "comparative analysis"),
    ("impact", "effects and consequences"),
    ("future", "predictions and trends"),
];

/// What the Principal learned about a query.
///
/// Always constructible from the query text alone ([`QueryAnalysis::heuristic`]);
/// a model's JSON analysis can refine it ([`QueryAnalysis::merge_model_json`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub complexity: String,
    pub domain: String,
    pub agents_needed: Vec<String>,
    pub strategy: String,
    pub key_aspects: Vec<String>,
    /// The query asks about recent or current events
    pub needs_current_info: bool,
    /// Web research should run in `auto` mode
    pub web_recommended: bool,
    /// A model analysis was merged in
    #[serde(default)]
    pub model_assisted: bool,
}

impl QueryAnalysis {
    /// Analyse a query from its text only
    pub fn heuristic(query: &Query) -> Self {
        let text = query.content().to_lowercase();
        let words = tokenize(&text);
        let word_count = query.word_count();

        let needs_current_info = needs_current_information(query.content());
        let web_recommended = needs_current_info || word_count >= LONG_QUERY_WORDS;

        let complexity = match word_count {
            0..=6 => "simple",
            7..=15 => "moderate",
            _ => "complex",
        };

        let domain = DOMAIN_KEYWORDS
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| words.contains(k)))
            .map(|(domain, _)| *domain)
            .unwrap_or("general");

        let mut agents_needed = vec![AgentRole::Specialist.default_name().to_string()];
        if web_recommended {
            agents_needed.push(AgentRole::Researcher.default_name().to_string());
        }
        agents_needed.push(AgentRole::Validator.default_name().to_string());

        let mut key_aspects: Vec<String> = ASPECT_PATTERNS
            .iter()
            .filter(|(pattern, _)| words.contains(pattern))
            .map(|(_, aspect)| aspect.to_string())
            .collect();
        if needs_current_info {
            key_aspects.push("recent developments".to_string());
        }
        if key_aspects.is_empty() {
            key_aspects = vec![
                "main topic".to_string(),
                "key information".to_string(),
                "practical applications".to_string(),
            ];
        }
        key_aspects.truncate(5);

        Self {
            complexity: complexity.to_string(),
            domain: domain.to_string(),
            agents_needed,
            strategy: "parallel".to_string(),
            key_aspects,
            needs_current_info,
            web_recommended,
            model_assisted: false,
        }
    }

    /// Refine with the JSON object a model produced.
    ///
    /// Only well-typed, non-empty fields override. A model can add web research
    /// to the plan but cannot drop it: when web research stays recommended,
    /// `agents_needed` keeps naming the Web Harvester.
    pub fn merge_model_json(mut self, json: &serde_json::Value) -> Self {
        let text = |key: &str| {
            json.get(key)
                .and_then(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let list = |key: &str| {
            json.get(key).and_then(|v| v.as_array()).map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
        };

        if let Some(complexity) = text("complexity") {
            self.complexity = complexity;
        }
        if let Some(domain) = text("domain") {
            self.domain = domain;
        }
        if let Some(strategy) = text("strategy") {
            self.strategy = strategy;
        }
        if let Some(aspects) = list("key_aspects").filter(|a| !a.is_empty()) {
            self.key_aspects = aspects;
        }
        if let Some(agents) = list("agents_needed").filter(|a| !a.is_empty()) {
            self.agents_needed = agents;
        }

        if self.requests(AgentRole::Researcher) {
            self.web_recommended = true;
        } else if self.web_recommended {
            let at = self
                .agents_needed
                .iter()
                .position(|label| AgentRole::from_label(label) == Some(AgentRole::Validator))
                .unwrap_or(self.agents_needed.len());
            self.agents_needed
                .insert(at, AgentRole::Researcher.default_name().to_string());
        }
        self.model_assisted = true;
        self
    }

    /// Whether `agents_needed` names an agent with this role
    pub fn requests(&self, role: AgentRole) -> bool {
        self.agents_needed
            .iter()
            .any(|label| AgentRole::from_label(label) == Some(role))
    }
}

/// Whether a query asks about recent or current events
pub fn needs_current_information(query: &str) -> bool {
    let lower = query.to_lowercase();
    let words = tokenize(&lower);

    let keyword = RECENCY_KEYWORDS.iter().any(|k| {
        if k.contains(' ') {
            lower.contains(k)
        } else {
            words.contains(k)
        }
    });
    let recent_year = words
        .iter()
        .filter_map(|w| w.parse::<u32>().ok())
        .any(|year| (2020..=2100).contains(&year));

    keyword || recent_year
}

fn tokenize(lower: &str) -> Vec<&str> {
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}
