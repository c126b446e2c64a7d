//! Application layer for localmind
//!
//! This crate contains the research orchestration use case, the agent
//! abstraction, port definitions and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AgentRegistry, OrchestratorConfig, RegistryError};
pub use ports::{
    event_sink::{EventSink, NoEvents},
    inference::{ChunkCallback, Generation, GenerationRequest, InferenceClient, InferenceError},
    telemetry::{FanReading, HostTelemetry, TelemetryProbe},
    web_search::{WebSearch, WebSearchError},
};
pub use use_cases::agent::{Agent, AgentContext, AgentExecutionError, AgentOutput};
pub use use_cases::run_research::{ResearchError, RunResearchUseCase};
