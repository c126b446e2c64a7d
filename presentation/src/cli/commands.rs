//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for one-shot research results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Only the final report
    #[default]
    Report,
    /// The complete result as JSON
    Json,
    /// Findings, report, quality score and metrics
    Full,
}

/// Research mode as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeArg {
    #[default]
    Auto,
    Simple,
    Expert,
}

impl From<ModeArg> for localmind_domain::ResearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => localmind_domain::ResearchMode::Auto,
            ModeArg::Simple => localmind_domain::ResearchMode::Simple,
            ModeArg::Expert => localmind_domain::ResearchMode::Expert,
        }
    }
}

/// CLI arguments for localmind
#[derive(Parser, Debug)]
#[command(name = "localmind")]
#[command(author, version, about = "Local multi-agent research server")]
#[command(long_about = r#"
localmind runs a small collective of local models as research agents.

A run moves through four phases:
1. Analyzing: the Principal Synthesizer studies the query
2. Parallel research: Domain Specialist and/or Web Harvester investigate
3. Validating: the Fact Validator checks the findings
4. Synthesizing: the Principal Synthesizer writes the final report

Configuration files are loaded from (in priority order):
1. LOCALMIND_* environment variables (e.g. LOCALMIND_SERVER__PORT=9000)
2. --config <path>        Explicit config file
3. ./localmind.toml       Project-level config
4. ~/.config/localmind/config.toml   Global config

Example:
  localmind serve --port 8000 --static-dir ./static
  localmind ask "Latest developments in solid-state batteries" --mode expert
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,

    /// Base URL of the Ollama runtime
    #[arg(long, global = true, value_name = "URL")]
    pub ollama_host: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the HTTP/WebSocket server (default)
    Serve(ServeArgs),
    /// Run one research query in the terminal
    Ask(AskArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory with the dashboard's static files
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AskArgs {
    /// The research query
    pub query: String,

    /// Research mode
    #[arg(short, long, value_enum, default_value = "auto")]
    pub mode: ModeArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "report")]
    pub output: OutputFormat,

    /// Suppress streamed agent output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given
    pub fn effective_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}
