//! Final report post-processing

use crate::research::result::Finding;
use regex::Regex;
use std::sync::LazyLock;

/// Phrases marking a line as the model talking about the task
const META_PHRASES: &[&str] = &["okay,", "i need to", "looking at", "the user", "let me"];

static THINK_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?(?:</think>|\z)").ok());

static REPORT_START: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)#.*?executive summary.*").ok());

/// Strip reasoning output from a synthesis.
///
/// Removes `<think>` blocks (including an unterminated trailing one), then
/// drops meta-commentary: a line containing a meta phrase is skipped along
/// with everything after it up to the next heading, bold line or blank
/// line. If a heading leads into an executive summary, text before it is
/// cut. Falls back to the trimmed raw text when nothing would be left.
pub fn clean_report(raw: &str) -> String {
    let mut text = match THINK_BLOCK.as_ref() {
        Some(re) => re.replace_all(raw, "").into_owned(),
        None => raw.to_string(),
    };
    // A stray closing tag means the opening one was never streamed
    if let Some(end) = text.rfind("</think>") {
        text = text[end + "</think>".len()..].to_string();
    }

    let mut kept = Vec::new();
    let mut skipping = false;
    for line in text.lines() {
        let lower = line.to_lowercase();
        if META_PHRASES.iter().any(|p| lower.contains(p)) {
            skipping = true;
            continue;
        }
        if skipping && (line.starts_with('#') || line.starts_with("**") || line.trim().is_empty()) {
            skipping = false;
        }
        if !skipping {
            kept.push(line);
        }
    }
    let mut cleaned = kept.join("\n").trim().to_string();

    if let Some(found) = REPORT_START.as_ref().and_then(|re| re.find(&cleaned)) {
        cleaned = cleaned[found.start()..].to_string();
    }

    if cleaned.is_empty() {
        raw.trim().to_string()
    } else {
        cleaned
    }
}

/// Section appended to the report naming agents that were unavailable
pub fn unavailable_note(findings: &[Finding]) -> Option<String> {
    let missing: Vec<&Finding> = findings.iter().filter(|f| !f.available).collect();
    if missing.is_empty() {
        return None;
    }
    let mut note = String::from("---\n**Note:** Some agents were unavailable for this run:\n");
    for finding in missing {
        note.push_str(&format!("- {}\n", finding.content));
    }
    Some(note.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_think_block() {
        let raw = "<think>\nThe user wants a summary.\n</think>\n\n# Executive Summary\nQubits.";
        assert_eq!(clean_report(raw), "# Executive Summary\nQubits.");
    }

    #[test]
    fn test_strips_leading_meta_commentary() {
        let raw = "Okay, let me write this.\nI need to combine the findings.\n\n## Summary\nDone.";
        assert_eq!(clean_report(raw), "## Summary\nDone.");
    }

    #[test]
    fn test_cuts_preamble_before_executive_summary() {
        let raw = "Here is the synthesized report you asked for.\n\n# Research Report\n## Executive Summary\nQubits superpose.";
        assert_eq!(
            clean_report(raw),
            "# Research Report\n## Executive Summary\nQubits superpose."
        );
    }

    #[test]
    fn test_drops_meta_lines_mid_report() {
        let raw = "# Executive Summary\nQubits.\nLet me double-check the validator output.\nDone.";
        assert_eq!(clean_report(raw), "# Executive Summary\nQubits.");
    }

    #[test]
    fn test_meta_skip_resumes_at_heading() {
        let raw = "## Findings\nA.\nLooking at the sources again,\nthey agree.\n## Conclusion\nB.";
        assert_eq!(clean_report(raw), "## Findings\nA.\n## Conclusion\nB.");
    }

    #[test]
    fn test_stray_closing_tag() {
        assert_eq!(clean_report("reasoning...</think>Report body"), "Report body");
    }

    #[test]
    fn test_unterminated_think_falls_back_to_raw() {
        let raw = "<think>still thinking";
        assert_eq!(clean_report(raw), raw);
    }

    #[test]
    fn test_plain_report_untouched() {
        assert_eq!(clean_report("  Quantum computers use qubits.  "), "Quantum computers use qubits.");
    }

    #[test]
    fn test_unavailable_note() {
        let findings = vec![
            Finding::success("Web Harvester", "ok"),
            Finding::unavailable("Domain Specialist", "timed out"),
        ];
        let note = unavailable_note(&findings).unwrap();
        assert!(note.contains("[Domain Specialist unavailable: timed out]"));
        assert!(!note.contains("Web Harvester"));
        assert!(unavailable_note(&findings[..1]).is_none());
    }
}
