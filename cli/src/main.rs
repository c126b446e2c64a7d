//! CLI entrypoint for localmind
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use localmind_application::{InferenceClient, RunResearchUseCase, TelemetryProbe};
use localmind_domain::{Query, ResearchRequest};
use localmind_infrastructure::{
    BraveSearch, ConfigLoader, FileConfig, FileLoggingConfig, HostProbe, OllamaClient,
};
use localmind_presentation::{
    AppState, AskArgs, Cli, Command, ConsoleFormatter, ConsoleSink, OutputFormat, ServerOptions,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .map_err(|e| anyhow!("failed to load configuration: {e}"))?;

    let command = cli.effective_command();
    apply_cli_overrides(&mut config, &cli, &command);
    config.validate().context("invalid configuration")?;

    let default_level = match command {
        Command::Serve(_) => "info",
        Command::Ask(_) => "warn",
    };
    let _log_guard = init_tracing(&cli, &config.logging, default_level)?;

    info!("Starting localmind");

    // === Dependency Injection ===
    let registry = Arc::new(config.to_registry()?);
    let client = Arc::new(
        OllamaClient::new(
            config.inference.base_url(),
            config.inference.idle_timeout(),
            config.inference.connect_timeout(),
        )
        .context("failed to build inference client")?,
    );
    info!("Inference runtime: {}", client.base_url());

    let telemetry: Arc<dyn TelemetryProbe> = Arc::new(HostProbe::new());
    let mut research = RunResearchUseCase::new(Arc::clone(&client), registry)
        .with_config(config.to_orchestrator_config())
        .with_telemetry(Arc::clone(&telemetry));

    match config.search.api_key() {
        Some(key) => {
            let search = BraveSearch::new(&config.search.endpoint, key, config.search.timeout())
                .context("failed to build web search client")?
                .with_count(config.search.count)
                .with_freshness(config.search.freshness.clone());
            research = research.with_web_search(Arc::new(search));
            info!("Web search: Brave Search API");
        }
        None => warn!("No search API key configured; Web Harvester will use simulated results"),
    }

    match command {
        Command::Serve(_) => run_server(&config, research, client, telemetry).await,
        Command::Ask(args) => run_ask(args, research).await,
    }
}

/// CLI flags take precedence over every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli, command: &Command) {
    if let Some(host) = &cli.ollama_host {
        config.inference.host = host.clone();
    }
    if let Command::Serve(args) = command {
        if let Some(host) = &args.host {
            config.server.host = host.clone();
        }
        if let Some(port) = args.port {
            config.server.port = port;
        }
        if let Some(dir) = &args.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
    }
    if cli.log_json {
        config.logging.json = true;
    }
}

/// Initialize logging.
///
/// `RUST_LOG` wins, then `-v` flags, then `[logging] level`.
fn init_tracing(
    cli: &Cli,
    logging: &FileLoggingConfig,
    default_level: &str,
) -> Result<Option<WorkerGuard>> {
    let directive = match cli.verbose {
        0 => logging
            .level
            .clone()
            .unwrap_or_else(|| default_level.to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(), // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(if logging.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    });

    let guard = match &logging.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "localmind.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(if logging.json {
                fmt::layer().json().with_writer(writer).boxed()
            } else {
                fmt::layer().with_ansi(false).with_writer(writer).boxed()
            });
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to initialize logging")?;
    Ok(guard)
}

async fn run_server(
    config: &FileConfig,
    research: RunResearchUseCase<OllamaClient>,
    client: Arc<OllamaClient>,
    telemetry: Arc<dyn TelemetryProbe>,
) -> Result<()> {
    match client.available_models().await {
        Ok(installed) => {
            for (model, agents) in research.registry().models() {
                if !installed.iter().any(|tag| model.matches_installed(tag)) {
                    warn!(
                        "Model {} (used by {}) is not installed; run `ollama pull {}`",
                        model,
                        agents.join(", "),
                        model
                    );
                }
            }
        }
        Err(e) => warn!("Inference runtime not reachable yet: {}", e),
    }

    let state = AppState::new(research, client, telemetry);
    let options = ServerOptions {
        static_dir: config.server.static_dir.clone(),
    };
    let app = localmind_presentation::router(state, &options);

    localmind_presentation::serve(&config.server.bind_address(), app, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn run_ask(args: AskArgs, research: RunResearchUseCase<OllamaClient>) -> Result<()> {
    let query = Query::try_new(args.query)?;
    let request = ResearchRequest::new(query, args.mode.into());
    let sink = if args.quiet {
        ConsoleSink::quiet()
    } else {
        ConsoleSink::new()
    };

    let cancellation = CancellationToken::new();
    let interrupt = cancellation.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        interrupt.cancel();
    });

    let result = research
        .execute_with_cancellation(request, &sink, &cancellation)
        .await?;

    let output = match args.output {
        OutputFormat::Report => ConsoleFormatter::format_report(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
        OutputFormat::Full => ConsoleFormatter::format_full(&result),
    };
    println!("{}", output);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "localmind",
            "--ollama-host",
            "http://gpu:11434",
            "--log-json",
            "serve",
            "--port",
            "9100",
        ]);
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli, &cli.effective_command());

        assert_eq!(config.inference.host, "http://gpu:11434");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.logging.json);
    }

    #[test]
    fn test_ask_leaves_server_settings() {
        let cli = Cli::parse_from(["localmind", "ask", "What is RAG?"]);
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli, &cli.effective_command());
        assert_eq!(config, FileConfig::default());
    }
}
