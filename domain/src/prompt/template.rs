//! Prompt templates for each agent role

use crate::web::{WebResult, format_for_prompt};

/// Templates for generating prompts at each stage of a run
pub struct PromptTemplate;

impl PromptTemplate {
    /// Principal Synthesizer: structured analysis of the query
    pub fn analysis(query: &str, today: &str) -> String {
        format!(
            r#"Today is {today}. Analyze this query for multi-agent processing.

Query: {query}

Decide:
1. Complexity level (simple/moderate/complex)
2. Domain (technology/science/business/health/general)
3. Which specialist agents are required
4. Processing strategy (parallel/sequential)
5. Two to five key aspects to research

Respond with ONLY a JSON object:
{{
    "complexity": "simple|moderate|complex",
    "domain": "technology|science|business|health|general",
    "agents_needed": ["Domain Specialist", "Web Harvester"],
    "strategy": "parallel|sequential",
    "key_aspects": ["aspect1", "aspect2"]
}}"#
        )
    }

    /// Domain Specialist
    pub fn specialist(query: &str, domain: &str, today: &str) -> String {
        format!(
            r#"As a {domain} domain specialist, analyze this query:

Query: {query}
Today's date: {today}

Provide expert analysis covering:
1. Core concepts and principles
2. Current state of the field
3. Key challenges and opportunities
4. Future implications

Keep the response concise (2-3 paragraphs)."#
        )
    }

    /// Web Harvester, grounded on search results
    pub fn researcher(
        query: &str,
        aspects: &[String],
        results: &[WebResult],
        simulated: bool,
        today: &str,
    ) -> String {
        let source_note = if simulated {
            "Live web search is unavailable; the results below are placeholders. \
             Rely on your own knowledge and say so."
        } else {
            "Ground your answer in these live web results and cite them by number."
        };
        format!(
            r#"Research this query focusing on: {aspects}

Query: {query}

=== Web Results ===
{results}

{source_note}

Provide current information (as of {today}) in 2-3 concise paragraphs."#,
            aspects = aspects.join(", "),
            results = format_for_prompt(results),
        )
    }

    /// Fact Validator over an excerpt of the research findings
    pub fn validator(findings_excerpt: &str, today: &str) -> String {
        format!(
            r#"Fact-check this content (today is {today}):

{findings_excerpt}

Identify and validate 3-5 key claims. For each:
1. State the claim
2. Assess validity (High/Medium/Low confidence)
3. Note any concerns

Be concise."#
        )
    }

    /// Principal Synthesizer: final report from `(agent, excerpt)` pairs
    pub fn synthesis(query: &str, findings: &[(String, String)], today: &str) -> String {
        let findings_text = findings
            .iter()
            .map(|(agent, content)| format!("=== {agent} ===\n{content}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            r#"Synthesize these multi-agent findings into a coherent report.

Query: {query}
Today's date: {today}

Agent Findings:
{findings_text}

IMPORTANT: Provide ONLY the final report content. Do not include any thinking,
reasoning, or meta-commentary. Start directly with the report.

The report should:
1. Combine insights from all agents
2. Resolve any conflicts
3. Highlight key findings
4. Provide actionable conclusions

Format it as markdown with an executive summary, a key findings section and a
conclusion, 3-4 paragraphs in total."#
        )
    }

    /// Quality Auditor over an excerpt of the report
    pub fn audit(report_excerpt: &str) -> String {
        format!(
            r#"Assess the quality of this research report:

{report_excerpt}

Rate each dimension from 1 to 10: accuracy, completeness, clarity, actionability.

Respond with ONLY a JSON object:
{{
    "accuracy": 8,
    "completeness": 7,
    "clarity": 9,
    "actionability": 8,
    "overall": 8,
    "strengths": ["clear", "well-structured"],
    "improvements": ["add more data"]
}}"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specialist_prompt() {
        let prompt = PromptTemplate::specialist("What is mRNA?", "health", "October 19, 2026");
        assert!(prompt.contains("As a health domain specialist"));
        assert!(prompt.contains("Query: What is mRNA?"));
        assert!(prompt.contains("October 19, 2026"));
    }

    #[test]
    fn test_researcher_prompt_flags_simulated_results() {
        let results = crate::web::simulated_results("q");
        let prompt = PromptTemplate::researcher("q", &["a".to_string()], &results, true, "today");
        assert!(prompt.contains("placeholders"));
        assert!(prompt.contains("1. [Simulated]"));
    }

    #[test]
    fn test_synthesis_prompt_lists_findings() {
        let findings = vec![
            ("Domain Specialist".to_string(), "Insight".to_string()),
            ("Fact Validator".to_string(), "Checked".to_string()),
        ];
        let prompt = PromptTemplate::synthesis("q", &findings, "today");
        assert!(prompt.contains("=== Domain Specialist ===\nInsight"));
        assert!(prompt.contains("=== Fact Validator ===\nChecked"));
    }

    #[test]
    fn test_json_braces_survive_formatting() {
        assert!(PromptTemplate::audit("r").contains("\"overall\": 8"));
        assert!(PromptTemplate::analysis("q", "d").contains("\"agents_needed\""));
    }
}
