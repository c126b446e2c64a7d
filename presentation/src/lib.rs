//! Presentation layer for localmind
//!
//! This crate contains the HTTP/WebSocket server (connection relay and
//! informational endpoints), CLI definitions, and console output for
//! one-shot runs.

pub mod cli;
pub mod output;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{AskArgs, Cli, Command, ModeArg, OutputFormat, ServeArgs};
pub use output::console::{ConsoleFormatter, ConsoleSink};
pub use server::{AppState, ServerError, ServerOptions, router, serve};
