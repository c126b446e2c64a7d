//! Configuration file loading for localmind
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LOCALMIND_*` environment variables
//! 2. `OLLAMA_HOST` / `BRAVE_API_KEY`
//! 3. `--config <path>` specified file
//! 4. Project root: `./localmind.toml` or `./.localmind.toml`
//! 5. Global: `$XDG_CONFIG_HOME/localmind/config.toml`
//! 6. Default values
//!
//! CLI flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_SEARCH_ENDPOINT, FileAgentConfig, FileAgentsConfig,
    FileConfig, FileInferenceConfig, FileLoggingConfig, FileOrchestratorConfig,
    FileSearchConfig, FileServerConfig,
};
pub use loader::{ConfigLoader, ENV_PREFIX};
