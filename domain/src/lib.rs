//! Domain layer for localmind
//!
//! This crate contains the core research concepts, entities and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Agents
//!
//! An agent is one model binding ([`AgentDescriptor`]) playing one
//! [`AgentRole`]. Exactly one agent exists per role:
//!
//! - **Synthesizer**: analyses the query and writes the final report
//! - **Specialist** / **Researcher**: run concurrently during research
//! - **Validator**: fact-checks the research output
//! - **Auditor**: scores the final report (expert mode)
//!
//! ## Research Runs
//!
//! A [`ResearchRun`] moves through [`RunState`]
//! (`analyzing -> parallel_research -> validating -> synthesizing -> complete`,
//! or `failed`) and reports progress as a stream of [`LifecycleEvent`]s.

pub mod agent;
pub mod core;
pub mod prompt;
pub mod research;
pub mod scenario;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use agent::{
    descriptor::AgentDescriptor, role::AgentRole, status::AgentStatus,
};
pub use core::{
    error::DomainError,
    model::{Model, ModelInfo},
    query::Query,
};
pub use prompt::{
    PromptTemplate,
    report::{clean_report, unavailable_note},
};
pub use research::{
    analysis::{QueryAnalysis, needs_current_information},
    event::{LifecycleEvent, TimedEvent},
    mode::ResearchMode,
    quality::QualityScore,
    result::{Finding, MemoryUsage, ResearchResult, RunMetrics},
    run::{AgentRecord, ResearchRequest, ResearchRun},
    state::RunState,
};
pub use scenario::DemoScenario;
pub use web::{WebResult, simulated_results};
