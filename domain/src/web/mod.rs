//! Web search results as seen by the Web Harvester.

use serde::{Deserialize, Serialize};

/// Prefix marking results that did not come from a live search
pub const SIMULATED_PREFIX: &str = "[Simulated]";

/// One ranked web search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

impl WebResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: snippet.into(),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.title.starts_with(SIMULATED_PREFIX)
    }
}

/// Placeholder results used when no live search is available.
///
/// Never empty; every entry is labelled with [`SIMULATED_PREFIX`] and points
/// at the reserved `.invalid` domain so it cannot be mistaken for a source.
pub fn simulated_results(query: &str) -> Vec<WebResult> {
    let slug: String = query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .take(6)
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "query".to_string() } else { slug };

    [
        ("Overview", "background and key concepts"),
        ("Recent coverage", "recent reporting and commentary"),
        ("Expert perspectives", "analysis from practitioners and researchers"),
    ]
    .iter()
    .enumerate()
    .map(|(i, (kind, about))| {
        WebResult::new(
            format!("{SIMULATED_PREFIX} {kind}: {query}"),
            format!("https://simulated.invalid/{slug}/{}", i + 1),
            format!("Offline placeholder for {about} on \"{query}\". Live web search is not configured."),
        )
    })
    .collect()
}

/// Render results as a numbered list for a prompt
pub fn format_for_prompt(results: &[WebResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}\n   {}\n   {}", i + 1, r.title, r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}
