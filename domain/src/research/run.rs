//! Research run aggregate

use super::event::LifecycleEvent;
use super::mode::ResearchMode;
use super::state::RunState;
use crate::agent::status::AgentStatus;
use crate::core::error::DomainError;
use crate::core::query::Query;
use crate::util::round_tenths;
use crate::web::WebResult;
use std::collections::BTreeMap;
use std::time::Instant;

/// A validated `{query, mode}` request
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchRequest {
    pub query: Query,
    pub mode: ResearchMode,
}

impl ResearchRequest {
    pub fn new(query: Query, mode: ResearchMode) -> Self {
        Self { query, mode }
    }
}

/// Per-agent state within one run
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRecord {
    pub name: String,
    pub status: AgentStatus,
    /// Concatenation of every streamed chunk
    pub text: String,
    pub tokens: u64,
    pub error: Option<String>,
}

impl AgentRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: AgentStatus::Idle,
            text: String::new(),
            tokens: 0,
            error: None,
        }
    }

    /// The agent was actually invoked during the run
    pub fn was_invoked(&self) -> bool {
        !matches!(self.status, AgentStatus::Idle | AgentStatus::Pending)
    }
}

/// Transient state of one research run (Entity)
///
/// Owned exclusively by the orchestration that created it and derived from
/// the lifecycle events that run emits, so two runs never share counters.
#[derive(Debug, Clone)]
pub struct ResearchRun {
    started_at: Instant,
    state: RunState,
    agents: Vec<AgentRecord>,
    web_results: Vec<WebResult>,
    web_search_used: bool,
}

impl Default for ResearchRun {
    fn default() -> Self {
        Self::new()
    }
}

impl ResearchRun {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            state: RunState::Analyzing,
            agents: Vec::new(),
            web_results: Vec::new(),
            web_search_used: false,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn web_results(&self) -> &[WebResult] {
        &self.web_results
    }

    pub fn web_search_used(&self) -> bool {
        self.web_search_used
    }

    pub fn record(&self, agent: &str) -> Option<&AgentRecord> {
        self.agents.iter().find(|r| r.name == agent)
    }

    fn record_mut(&mut self, agent: &str) -> &mut AgentRecord {
        let idx = match self.agents.iter().position(|r| r.name == agent) {
            Some(idx) => idx,
            None => {
                self.agents.push(AgentRecord::new(agent));
                self.agents.len() - 1
            }
        };
        &mut self.agents[idx]
    }

    /// Fold one event into the run state
    pub fn apply(&mut self, event: &LifecycleEvent) -> Result<(), DomainError> {
        match event {
            LifecycleEvent::Phase {
                phase,
                agent,
                agents,
            } => {
                if *phase != self.state {
                    self.state = self.state.transition(*phase)?;
                }
                for name in agent.iter().chain(agents.iter().flatten()) {
                    let record = self.record_mut(name);
                    if record.status == AgentStatus::Idle {
                        record.status = AgentStatus::Pending;
                    }
                }
            }
            LifecycleEvent::AgentThinking { agent, .. } => {
                let record = self.record_mut(agent);
                record.status = AgentStatus::Thinking;
                record.error = None;
            }
            LifecycleEvent::AgentStream { agent, chunk } => {
                let record = self.record_mut(agent);
                record.status = AgentStatus::Active;
                record.text.push_str(chunk);
            }
            LifecycleEvent::AgentResponse { agent, tokens, .. } => {
                let record = self.record_mut(agent);
                record.status = AgentStatus::Done;
                record.tokens += tokens.unwrap_or(0);
            }
            LifecycleEvent::AgentError { agent, error } => {
                let record = self.record_mut(agent);
                record.status = AgentStatus::Error;
                record.error = Some(error.clone());
            }
            LifecycleEvent::WebResults {
                websites,
                simulated,
                ..
            } => {
                self.web_results = websites.clone();
                self.web_search_used = !simulated;
            }
            LifecycleEvent::Complete { .. } => {
                self.state = self.state.transition(RunState::Complete)?;
            }
            LifecycleEvent::Error { .. } => self.fail(),
            LifecycleEvent::Init { .. }
            | LifecycleEvent::WebSearch { .. }
            | LifecycleEvent::Pong
            | LifecycleEvent::Rejected { .. } => {}
        }
        Ok(())
    }

    /// Move to `Failed` unless already terminal
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = RunState::Failed;
        }
    }

    /// Count tokens spent outside a streamed response
    pub fn add_tokens(&mut self, agent: &str, tokens: u64) {
        self.record_mut(agent).tokens += tokens;
    }

    pub fn total_tokens(&self) -> u64 {
        self.agents.iter().map(|r| r.tokens).sum()
    }

    pub fn tokens_by_agent(&self) -> BTreeMap<String, u64> {
        self.agents
            .iter()
            .filter(|r| r.was_invoked() || r.tokens > 0)
            .map(|r| (r.name.clone(), r.tokens))
            .collect()
    }

    /// Agents invoked during the run, including failed ones
    pub fn invoked_count(&self) -> usize {
        self.agents.iter().filter(|r| r.was_invoked()).count()
    }

    /// Whether the chunks streamed for `agent` concatenate to `output`.
    ///
    /// An agent that streamed nothing trivially matches an empty output.
    pub fn streamed_matches(&self, agent: &str, output: &str) -> bool {
        self.record(agent).map_or(output.is_empty(), |r| r.text == output)
    }

    /// Seconds since the run started, one decimal
    pub fn elapsed_secs(&self) -> f64 {
        round_tenths(self.started_at.elapsed().as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> ResearchRun {
        ResearchRun::new()
    }

    fn stream(agent: &str, chunk: &str) -> LifecycleEvent {
        LifecycleEvent::AgentStream {
            agent: agent.to_string(),
            chunk: chunk.to_string(),
        }
    }

    #[test]
    fn test_agent_lifecycle_folding() {
        let mut run = run();
        run.apply(&LifecycleEvent::phase_many(
            RunState::ParallelResearch,
            vec!["Web Harvester".to_string()],
        ))
        .unwrap();
        assert_eq!(run.record("Web Harvester").unwrap().status, AgentStatus::Pending);

        run.apply(&LifecycleEvent::AgentThinking {
            agent: "Web Harvester".to_string(),
            model: "qwen3:4b".to_string(),
            temperature: 0.3,
        })
        .unwrap();
        run.apply(&stream("Web Harvester", "Quantum ")).unwrap();
        run.apply(&stream("Web Harvester", "bits")).unwrap();
        run.apply(&LifecycleEvent::AgentResponse {
            agent: "Web Harvester".to_string(),
            complete: true,
            tokens: Some(2),
        })
        .unwrap();

        let record = run.record("Web Harvester").unwrap();
        assert_eq!(record.text, "Quantum bits");
        assert!(run.streamed_matches("Web Harvester", "Quantum bits"));
        assert!(!run.streamed_matches("Web Harvester", "Quantum bits!"));
        assert!(run.streamed_matches("Fact Validator", ""));
        assert_eq!(record.status, AgentStatus::Done);
        assert_eq!(run.total_tokens(), 2);
        assert_eq!(run.invoked_count(), 1);
    }

    #[test]
    fn test_illegal_phase_is_rejected() {
        let mut run = run();
        let err = run.apply(&LifecycleEvent::phase(RunState::Synthesizing, "Principal Synthesizer"));
        assert!(err.is_err());
        assert_eq!(run.state(), RunState::Analyzing);
    }

    #[test]
    fn test_error_fails_run_once() {
        let mut run = run();
        run.apply(&LifecycleEvent::error("synthesis failed")).unwrap();
        assert_eq!(run.state(), RunState::Failed);
        run.fail();
        assert_eq!(run.state(), RunState::Failed);
    }

    #[test]
    fn test_pending_agents_not_counted() {
        let mut run = run();
        run.apply(&LifecycleEvent::phase_many(
            RunState::ParallelResearch,
            vec!["Domain Specialist".to_string()],
        ))
        .unwrap();
        run.add_tokens("Principal Synthesizer", 40);
        assert_eq!(run.invoked_count(), 0);
        let by_agent = run.tokens_by_agent();
        assert_eq!(by_agent.get("Principal Synthesizer"), Some(&40));
        assert!(!by_agent.contains_key("Domain Specialist"));
    }

    #[test]
    fn test_web_results_recorded() {
        let mut run = run();
        run.apply(&LifecycleEvent::WebResults {
            agent: "Web Harvester".to_string(),
            count: 1,
            websites: vec![WebResult::new("t", "u", "s")],
            simulated: false,
        })
        .unwrap();
        assert!(run.web_search_used());
        assert_eq!(run.web_results().len(), 1);
    }
}
