use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use campaign::models::{CampaignConfig, Credentials};

/// Query used by `campaign run` when none is given.
const DEFAULT_QUERY: &str = "eco-friendly products";

#[derive(Parser, Debug)]
#[command(name = "campaign", about = "Multi-agent e-commerce campaign generator")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/campaign.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API and the interactive page
    Serve,

    /// Run the pipeline once and print the outcome as JSON
    Run {
        #[arg(default_value = DEFAULT_QUERY)]
        query: String,

        /// Pretty-print the output JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn load_config(path: &str) -> Result<CampaignConfig> {
    if !Path::new(path).exists() {
        tracing::info!(path, "No config file, using defaults");
        return Ok(CampaignConfig::default());
    }
    let config_str =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    toml::from_str(&config_str).with_context(|| format!("Failed to parse config: {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let services = campaign::build_services(&config, &Credentials::from_env());

    match cli.command {
        Command::Serve => {
            let cancel = CancellationToken::new();
            let shutdown = cancel.clone();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Received shutdown signal");
                shutdown.cancel();
            });

            campaign::server::serve(services, &config.server, &config.ui, cancel).await?;
        }
        Command::Run { query, pretty } => {
            let outcome = services
                .pipeline
                .run(&query)
                .await
                .map_err(|e| anyhow::anyhow!("Campaign run failed: {e}"))?;

            let output = if pretty {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string(&outcome)?
            };
            println!("{output}");
        }
    }

    Ok(())
}
