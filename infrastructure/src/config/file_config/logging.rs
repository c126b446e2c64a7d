//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// `-v` flags and `RUST_LOG` take precedence over `level`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"localmind=debug"`
    pub level: Option<String>,
    /// Emit JSON formatted log lines
    pub json: bool,
    /// Also write daily-rotated log files here
    pub directory: Option<PathBuf>,
}
