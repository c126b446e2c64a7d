//! Infrastructure layer for localmind
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the Ollama inference client, Brave web
//! search, the host telemetry probe, and configuration file loading.

pub mod config;
pub mod ollama;
pub mod search;
pub mod telemetry;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileAgentsConfig, FileConfig,
    FileInferenceConfig, FileLoggingConfig, FileOrchestratorConfig, FileSearchConfig,
    FileServerConfig,
};
pub use ollama::OllamaClient;
pub use search::BraveSearch;
pub use telemetry::HostProbe;
