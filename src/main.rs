//! aivengers-mcp - Main Entry Point
//!
//! Serves the MCP bridge on stdin/stdout. Logs go to stderr.

use aivengers_mcp::config::{BackendConfig, API_KEY_ENV};
use aivengers_mcp::observability::init_logging_with_verbosity;
use aivengers_mcp::transport::TransportError;
use aivengers_mcp::{ChannelEndpoint, Dispatcher, HttpBackend, ToolRegistry};
use clap::{Parser, Subcommand};
use std::process;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// MCP bridge to the AGIverse action backend
#[derive(Parser)]
#[command(name = "aivengers-mcp")]
#[command(about = "MCP server exposing AGIverse action search and execution as tools")]
#[command(version)]
struct Cli {
    /// Backend API key attached to action calls
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP channel on stdin/stdout (default)
    Serve,
    /// Print the advertised tool descriptors as JSON
    Tools,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging_with_verbosity(cli.verbose);

    let config = BackendConfig::new(cli.api_key);
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(Arc::new(config)).await,
        Commands::Tools => print_tools(),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_server(config: Arc<BackendConfig>) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Starting aivengers-mcp v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.origin
    );

    if !config.has_api_key() {
        warn!(
            "{} is not set; action calls will be sent without an API key",
            API_KEY_ENV
        );
    }

    let endpoint = build_endpoint(config)?;

    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())?;
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        served = serve_stdio(&endpoint) => {
            served?;
            info!("Client closed the channel");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Wire the registry, backend and dispatcher into an endpoint
fn build_endpoint(
    config: Arc<BackendConfig>,
) -> Result<ChannelEndpoint, Box<dyn std::error::Error>> {
    let registry = Arc::new(ToolRegistry::new());
    let backend = Arc::new(HttpBackend::new(config)?);
    let dispatcher = Dispatcher::new(registry, backend);
    Ok(ChannelEndpoint::new(dispatcher))
}

async fn serve_stdio(endpoint: &ChannelEndpoint) -> Result<(), TransportError> {
    endpoint
        .serve(tokio::io::stdin(), tokio::io::stdout())
        .await
}

fn print_tools() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ToolRegistry::new();
    println!("{}", serde_json::to_string_pretty(&registry.list_tools())?);
    Ok(())
}
