//! Console output for one-shot research runs

use colored::Colorize;
use localmind_application::EventSink;
use localmind_domain::{LifecycleEvent, ResearchResult, RunState};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Streams a run's progress to stderr, keeping stdout for the final result.
///
/// Research agents run concurrently, so chunks from different agents
/// interleave; a header line is printed whenever the streaming agent changes.
pub struct ConsoleSink {
    quiet: bool,
    last_agent: Mutex<Option<String>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            quiet: false,
            last_agent: Mutex::new(None),
        }
    }

    /// Only phases and errors, no streamed text
    pub fn quiet() -> Self {
        Self {
            quiet: true,
            last_agent: Mutex::new(None),
        }
    }

    fn switch_agent(&self, agent: &str) -> bool {
        let mut last = self.last_agent.lock().unwrap_or_else(PoisonError::into_inner);
        if last.as_deref() == Some(agent) {
            return false;
        }
        *last = Some(agent.to_string());
        true
    }

    fn phase_title(phase: RunState) -> &'static str {
        match phase {
            RunState::Analyzing => "Analyzing query",
            RunState::ParallelResearch => "Parallel research",
            RunState::Validating => "Validating findings",
            RunState::Synthesizing => "Synthesizing report",
            RunState::Complete => "Complete",
            RunState::Failed => "Failed",
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: LifecycleEvent) {
        let mut err = std::io::stderr().lock();
        match event {
            LifecycleEvent::Init { query, mode, .. } => {
                let _ = writeln!(
                    err,
                    "{} {} {}",
                    "Researching:".cyan().bold(),
                    query,
                    format!("({} mode)", mode.as_str()).dimmed()
                );
            }
            LifecycleEvent::Phase {
                phase,
                agent,
                agents,
            } => {
                let who = agents
                    .map(|a| a.join(", "))
                    .or(agent)
                    .unwrap_or_default();
                let _ = writeln!(
                    err,
                    "\n{} {}",
                    format!("▶ {}", Self::phase_title(phase)).cyan().bold(),
                    who.dimmed()
                );
                self.last_agent
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
            }
            LifecycleEvent::AgentThinking {
                agent,
                model,
                temperature,
            } => {
                let _ = writeln!(
                    err,
                    "  {} {} {}",
                    "•".yellow(),
                    agent.yellow(),
                    format!("[{model} @ {temperature}]").dimmed()
                );
            }
            LifecycleEvent::AgentStream { agent, chunk } => {
                if self.quiet {
                    return;
                }
                if self.switch_agent(&agent) {
                    let _ = write!(err, "\n{}\n", format!("── {agent} ──").yellow().bold());
                }
                let _ = write!(err, "{chunk}");
            }
            LifecycleEvent::AgentResponse { agent, tokens, .. } => {
                let tokens = tokens.map(|t| format!(" ({t} tokens)")).unwrap_or_default();
                let _ = writeln!(err, "\n  {} {}{}", "✓".green(), agent, tokens.dimmed());
            }
            LifecycleEvent::AgentError { agent, error } => {
                let _ = writeln!(err, "\n  {} {}: {}", "✗".red(), agent.red(), error);
            }
            LifecycleEvent::WebSearch { agent } => {
                let _ = writeln!(err, "  {} {} searching the web", "⌕".blue(), agent);
            }
            LifecycleEvent::WebResults {
                count, simulated, ..
            } => {
                let note = if simulated { " (simulated)" } else { "" };
                let _ = writeln!(err, "  {} {} results{}", "⌕".blue(), count, note.dimmed());
            }
            LifecycleEvent::Complete { result } => {
                let _ = writeln!(
                    err,
                    "\n{} in {:.1}s, {} tokens",
                    "Research complete".green().bold(),
                    result.metrics.total_time,
                    result.metrics.total_tokens
                );
            }
            LifecycleEvent::Error { message } => {
                let _ = writeln!(err, "\n{} {}", "Research failed:".red().bold(), message);
            }
            LifecycleEvent::Pong | LifecycleEvent::Rejected { .. } => {}
        }
        let _ = err.flush();
    }
}

/// Formats a finished run for stdout
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The report alone
    pub fn format_report(result: &ResearchResult) -> String {
        format!(
            "{}\n\n{} {}\n\n{}\n",
            "=== Research Report ===".cyan().bold(),
            "Q:".bold(),
            result.query,
            result.report
        )
    }

    /// Format as JSON
    pub fn format_json(result: &ResearchResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Findings, report, quality score and metrics
    pub fn format_full(result: &ResearchResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Research Results"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), result.query));
        output.push_str(&format!(
            "{} {}\n",
            "Mode:".cyan().bold(),
            result.mode.as_str()
        ));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Domain:".cyan().bold(),
            result.analysis.domain,
            result.analysis.complexity
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Agents:".cyan().bold(),
            result.agents_used.join(", ")
        ));

        output.push_str(&Self::section_header("Findings"));
        for finding in &result.findings {
            let title = format!("── {} ──", finding.agent);
            let title = if finding.available {
                title.yellow().bold()
            } else {
                title.red().bold()
            };
            output.push_str(&format!("\n{}\n{}\n", title, finding.content));
        }

        if !result.websites.is_empty() {
            let label = if result.web_search_used {
                "Sources"
            } else {
                "Sources (simulated)"
            };
            output.push_str(&Self::section_header(label));
            for site in &result.websites {
                output.push_str(&format!("  * {} <{}>\n", site.title, site.url));
            }
        }

        output.push_str(&Self::section_header("Report"));
        output.push_str(&format!("\n{}\n", result.report));

        if let Some(score) = &result.quality_score {
            output.push_str(&Self::section_header("Quality"));
            output.push_str(&format!(
                "  accuracy {:.1} | completeness {:.1} | clarity {:.1} | actionability {:.1} | {} {:.1}\n",
                score.accuracy,
                score.completeness,
                score.clarity,
                score.actionability,
                "overall".bold(),
                score.overall
            ));
            for strength in &score.strengths {
                output.push_str(&format!("  {} {}\n", "+".green(), strength));
            }
            for improvement in &score.improvements {
                output.push_str(&format!("  {} {}\n", "-".yellow(), improvement));
            }
        }

        output.push_str(&Self::section_header("Metrics"));
        output.push_str(&format!(
            "  {:.1}s, {} agents, {} tokens\n",
            result.metrics.total_time, result.metrics.agent_count, result.metrics.total_tokens
        ));
        for (agent, tokens) in &result.metrics.tokens_by_agent {
            output.push_str(&format!("  {}: {}\n", agent, tokens));
        }

        output.push_str(&Self::footer());
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
