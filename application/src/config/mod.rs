//! Application-level configuration.
//!
//! - [`AgentRegistry`]: the immutable agent bindings shared by every run
//! - [`OrchestratorConfig`]: retry policy, excerpt sizes and analysis toggle

pub mod agent_registry;
pub mod orchestrator_config;

pub use agent_registry::{AgentRegistry, RegistryError};
pub use orchestrator_config::OrchestratorConfig;
