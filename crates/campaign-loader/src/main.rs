use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use campaign_loader::Ingestor;
use campaign_models::{CampaignConfig, Credentials};
use campaign_store::{IndexSpec, OpenAiEmbedder, PineconeClient};

#[derive(Parser, Debug)]
#[command(
    name = "campaign-loader",
    about = "Rebuild the campaign trend index from a CSV of trends"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/campaign.toml")]
    config: String,

    /// Trend CSV to load (overrides ingest.csv_path)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Pretty-print the ingestion report
    #[arg(long)]
    pretty: bool,
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
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let credentials = Credentials::from_env();

    let csv_path = cli
        .csv
        .unwrap_or_else(|| PathBuf::from(&config.ingest.csv_path));

    let embedder = Arc::new(OpenAiEmbedder::new(
        credentials.openai_api_key.clone(),
        config.embeddings.clone(),
    ));
    let client = Arc::new(
        PineconeClient::new(
            credentials.pinecone_api_key.clone(),
            config.vector_store.clone(),
            embedder,
        )
        .with_upsert_batch_size(config.ingest.upsert_batch_size),
    );

    tracing::info!(
        index = client.index_name(),
        csv = %csv_path.display(),
        "Rebuilding trend index"
    );

    let ingestor = Ingestor::new(
        client.clone(),
        client,
        IndexSpec::from(&config.vector_store),
    )
    .with_settle(Duration::from_secs(config.ingest.settle_seconds));

    let report = ingestor
        .ingest_file(&csv_path)
        .await
        .with_context(|| format!("Failed to ingest {}", csv_path.display()))?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{output}");

    Ok(())
}
