//! Lifecycle events streamed to clients

use super::mode::ResearchMode;
use super::result::ResearchResult;
use super::state::RunState;
use crate::web::WebResult;
use serde::{Deserialize, Serialize};

/// An ordered, immutable notification produced during a research run.
///
/// Serialized with a `type` tag in snake_case, which is the wire format of
/// the socket protocol (`{"type": "agent_stream", "agent": ..., "chunk": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Run accepted and starting
    Init {
        query: String,
        mode: ResearchMode,
        timestamp: String,
    },
    /// State machine transition
    Phase {
        phase: RunState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agents: Option<Vec<String>>,
    },
    AgentThinking {
        agent: String,
        model: String,
        temperature: f32,
    },
    /// One text fragment, append-only
    AgentStream { agent: String, chunk: String },
    AgentResponse {
        agent: String,
        complete: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tokens: Option<u64>,
    },
    /// Recoverable per-agent failure
    AgentError { agent: String, error: String },
    WebSearch { agent: String },
    WebResults {
        agent: String,
        count: usize,
        websites: Vec<WebResult>,
        simulated: bool,
    },
    Complete { result: Box<ResearchResult> },
    /// Run aborted
    Error { message: String },
    Pong,
    /// Request refused before a run started (busy connection, empty query)
    Rejected { message: String },
}

/// A run event stamped with seconds since its run started.
///
/// Serializes as the event's own fields plus `elapsed`, e.g.
/// `{"type": "agent_stream", "agent": ..., "chunk": ..., "elapsed": 3.2}`.
/// Events outside a run (`pong`, `rejected`) carry no stamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedEvent {
    #[serde(flatten)]
    pub event: LifecycleEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
}

impl TimedEvent {
    pub fn at(event: LifecycleEvent, elapsed: f64) -> Self {
        Self {
            event,
            elapsed: Some(elapsed),
        }
    }
}

impl From<LifecycleEvent> for TimedEvent {
    fn from(event: LifecycleEvent) -> Self {
        Self {
            event,
            elapsed: None,
        }
    }
}

impl LifecycleEvent {
    pub fn phase(phase: RunState, agent: impl Into<String>) -> Self {
        LifecycleEvent::Phase {
            phase,
            agent: Some(agent.into()),
            agents: None,
        }
    }

    pub fn phase_many(phase: RunState, agents: Vec<String>) -> Self {
        LifecycleEvent::Phase {
            phase,
            agent: None,
            agents: Some(agents),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        LifecycleEvent::Error {
            message: message.into(),
        }
    }

    /// Wire name of this event
    pub fn type_name(&self) -> &'static str {
        match self {
            LifecycleEvent::Init { .. } => "init",
            LifecycleEvent::Phase { .. } => "phase",
            LifecycleEvent::AgentThinking { .. } => "agent_thinking",
            LifecycleEvent::AgentStream { .. } => "agent_stream",
            LifecycleEvent::AgentResponse { .. } => "agent_response",
            LifecycleEvent::AgentError { .. } => "agent_error",
            LifecycleEvent::WebSearch { .. } => "web_search",
            LifecycleEvent::WebResults { .. } => "web_results",
            LifecycleEvent::Complete { .. } => "complete",
            LifecycleEvent::Error { .. } => "error",
            LifecycleEvent::Pong => "pong",
            LifecycleEvent::Rejected { .. } => "rejected",
        }
    }

    /// `complete` or `error`: the last event of an accepted run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecycleEvent::Complete { .. } | LifecycleEvent::Error { .. }
        )
    }

    /// The agent this event is attributed to, if any
    pub fn agent(&self) -> Option<&str> {
        match self {
            LifecycleEvent::AgentThinking { agent, .. }
            | LifecycleEvent::AgentStream { agent, .. }
            | LifecycleEvent::AgentResponse { agent, .. }
            | LifecycleEvent::AgentError { agent, .. }
            | LifecycleEvent::WebSearch { agent }
            | LifecycleEvent::WebResults { agent, .. } => Some(agent),
            LifecycleEvent::Phase { agent, .. } => agent.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let event = LifecycleEvent::AgentStream {
            agent: "Web Harvester".to_string(),
            chunk: "Hello".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "agent_stream", "agent": "Web Harvester", "chunk": "Hello"})
        );
        assert_eq!(event.type_name(), "agent_stream");
    }

    #[test]
    fn test_phase_omits_absent_fields() {
        let json = serde_json::to_value(LifecycleEvent::phase(
            RunState::Analyzing,
            "Principal Synthesizer",
        ))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "phase", "phase": "analyzing", "agent": "Principal Synthesizer"})
        );
    }

    #[test]
    fn test_pong_and_terminal() {
        assert_eq!(
            serde_json::to_string(&LifecycleEvent::Pong).unwrap(),
            r#"{"type":"pong"}"#
        );
        assert!(LifecycleEvent::error("boom").is_terminal());
        assert!(!LifecycleEvent::Pong.is_terminal());
        assert!(
            !LifecycleEvent::Rejected {
                message: "busy".to_string()
            }
            .is_terminal()
        );
    }

    #[test]
    fn test_timed_event_adds_elapsed() {
        let event = TimedEvent::at(
            LifecycleEvent::AgentStream {
                agent: "Web Harvester".to_string(),
                chunk: "Hi".to_string(),
            },
            3.2,
        );
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"type": "agent_stream", "agent": "Web Harvester", "chunk": "Hi", "elapsed": 3.2})
        );
        assert_eq!(
            serde_json::to_string(&TimedEvent::from(LifecycleEvent::Pong)).unwrap(),
            r#"{"type":"pong"}"#
        );
    }

    #[test]
    fn test_deserialize_round_trip_of_type_tag() {
        let event: LifecycleEvent =
            serde_json::from_str(r#"{"type":"agent_response","agent":"A","complete":true}"#)
                .unwrap();
        assert_eq!(
            event,
            LifecycleEvent::AgentResponse {
                agent: "A".to_string(),
                complete: true,
                tokens: None
            }
        );
    }
}
