use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use x_mcp_server::client::{MediaFetcher, XClient};
use x_mcp_server::config::{self, Transport};
use x_mcp_server::api;
use x_mcp_server::tools::{build_registry, ToolContext};

#[derive(Parser, Debug)]
#[command(name = "x-mcp-server")]
#[command(about = "MCP server for the X (Twitter) API", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override transport (stdio, http)
    #[arg(long)]
    transport: Option<Transport>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = config::load_config(&cli.config).with_context(|| {
        format!(
            "Failed to load configuration from: {}",
            cli.config.display()
        )
    })?;

    // Apply CLI overrides
    if let Some(transport) = cli.transport {
        config.server.transport = transport;
    }
    if let Some(log_level) = cli.log_level {
        config.logging.level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        config.logging.format = log_format;
    }
    config::validate_config(&config)?;

    init_logging(&config.logging)?;

    // Credentials are checked before any tool is registered
    let credentials = config::load_credentials()?;

    let client = XClient::new(&config.api, &credentials)?;
    let fetcher = MediaFetcher::new(config.api.timeout())?;
    let ctx = ToolContext::new(client, fetcher);
    let registry = Arc::new(build_registry(&ctx, &config.tools)?);

    print_banner(&config, registry.len());

    info!("Starting x-mcp-server...");
    api::start_server(&config, registry).await?;

    Ok(())
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_logging(config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}

fn print_banner(config: &config::AppConfig, tool_count: usize) {
    let version = env!("CARGO_PKG_VERSION");
    let width = 59usize;
    let border = "═".repeat(width + 2);
    let line = |content: &str| {
        info!("║ {:width$} ║", content, width = width);
    };

    info!("╔{}╗", border);
    line("X-MCP-SERVER");
    line(&format!("X (Twitter) MCP Server v{}", version));
    info!("╚{}╝", border);
    info!("");
    info!("Server Configuration:");
    info!("  → Transport: {}", config.server.transport);
    if config.server.transport == Transport::Http {
        info!("  → Address: {}:{}", config.server.host, config.server.port);
        if config.server.allowed_origins.is_empty() {
            info!("  → Browser Origins: none");
        } else {
            info!(
                "  → Browser Origins: {}",
                config.server.allowed_origins.join(", ")
            );
        }
    }
    info!("  → Log Level: {}", config.logging.level);
    info!("  → Log Format: {}", config.logging.format);
    info!("  → API: {}", config.api.api_url);
    info!("  → Enabled Groups: {}", config.tools.enabled_groups_label());
    info!("  → Tools: {}", tool_count);
    info!("");
}
