//! Multi-agent e-commerce campaign generator.
//!
//! Turns a free-text product query into a product idea, supporting market
//! trends retrieved from a vector index, and an optimized campaign plan.
//! Served over a JSON endpoint and an interactive page.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use campaign::models::{CampaignConfig, Credentials};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let services = campaign::build_services(&CampaignConfig::default(), &Credentials::from_env());
//! let outcome = services.pipeline.run("eco-friendly products").await?;
//! println!("{}", outcome.campaign_plan);
//! # Ok(())
//! # }
//! ```

pub use campaign_agents as agents;
pub use campaign_models as models;
pub use campaign_store as store;

pub mod api;
pub mod error;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use campaign_agents::{CampaignPipeline, LanguageModel, OpenAiChat};
use campaign_models::{CampaignConfig, Credentials};
use campaign_store::{Embedder, OpenAiEmbedder, PineconeClient, TrendDashboard, TrendStore};
use tracing::info;

/// Process-wide handles shared by every request.
#[derive(Clone)]
pub struct Services {
    pub pipeline: Arc<CampaignPipeline>,
    pub dashboard: Arc<TrendDashboard>,
}

impl Services {
    /// Assemble services around already-built model and store handles.
    pub fn from_parts(
        config: &CampaignConfig,
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn TrendStore>,
    ) -> Self {
        let pipeline =
            CampaignPipeline::from_parts(llm, Arc::clone(&store), config.pipeline.trend_k);
        let dashboard = TrendDashboard::new(store, config.dashboard.clone());
        Self {
            pipeline: Arc::new(pipeline),
            dashboard: Arc::new(dashboard),
        }
    }
}

/// Build the hosted-service clients from configuration.
///
/// Missing credentials do not fail here; the first call that needs one does.
pub fn build_services(config: &CampaignConfig, credentials: &Credentials) -> Services {
    let chat = OpenAiChat::new(credentials.openai_api_key.clone(), config.llm.clone());
    let embedder = OpenAiEmbedder::new(
        credentials.openai_api_key.clone(),
        config.embeddings.clone(),
    );
    info!(
        chat_model = chat.model(),
        embedding_model = embedder.model(),
        "Language model clients configured"
    );

    let embedder: Arc<dyn Embedder> = Arc::new(embedder);
    let index = PineconeClient::new(
        credentials.pinecone_api_key.clone(),
        config.vector_store.clone(),
        embedder,
    );
    info!(index = index.index_name(), "Trend index client configured");

    let llm: Arc<dyn LanguageModel> = Arc::new(chat);
    let store: Arc<dyn TrendStore> = Arc::new(index);
    Services::from_parts(config, llm, store)
}
