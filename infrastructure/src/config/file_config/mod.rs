//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! once validated.

mod agents;
mod inference;
mod logging;
mod orchestrator;
mod search;
mod server;

pub use agents::{FileAgentConfig, FileAgentsConfig};
pub use inference::FileInferenceConfig;
pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use search::{DEFAULT_SEARCH_ENDPOINT, FileSearchConfig};
pub use server::FileServerConfig;

use localmind_application::{AgentRegistry, OrchestratorConfig, RegistryError};
use localmind_domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroValue(&'static str),

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),

    #[error("invalid agent binding: {0}")]
    InvalidAgent(#[from] DomainError),

    #[error("invalid agent registry: {0}")]
    InvalidRegistry(#[from] RegistryError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP / WebSocket server
    pub server: FileServerConfig,
    /// Local inference runtime
    pub inference: FileInferenceConfig,
    /// Web search capability
    pub search: FileSearchConfig,
    /// Research orchestration tuning
    pub orchestrator: FileOrchestratorConfig,
    /// Per-role agent bindings
    pub agents: FileAgentsConfig,
    /// Log output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration.
    ///
    /// An absent search key is not an error; the Web Harvester falls back to
    /// simulated results.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::ZeroValue("server.port"));
        }
        if self.inference.host.trim().is_empty() {
            return Err(ConfigValidationError::EmptyValue("inference.host"));
        }
        if self.inference.idle_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroValue("inference.idle_timeout_secs"));
        }
        if self.inference.connect_timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroValue(
                "inference.connect_timeout_secs",
            ));
        }
        if self.inference.max_tokens == 0 {
            return Err(ConfigValidationError::ZeroValue("inference.max_tokens"));
        }
        if self.search.timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroValue("search.timeout_secs"));
        }
        if self.search.count == 0 {
            return Err(ConfigValidationError::ZeroValue("search.count"));
        }

        // Model names, temperatures and role uniqueness
        self.to_registry()?;
        Ok(())
    }

    /// Build the agent registry from the `[agents]` overrides
    pub fn to_registry(&self) -> Result<AgentRegistry, ConfigValidationError> {
        let descriptors = self.agents.to_descriptors()?;
        Ok(AgentRegistry::new(descriptors)?)
    }

    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        self.orchestrator
            .to_orchestrator_config(self.inference.max_tokens)
    }
}
