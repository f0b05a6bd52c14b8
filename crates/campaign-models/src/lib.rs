pub mod campaign;
pub mod chat;
pub mod config;
pub mod trend;

pub use campaign::CampaignOutcome;
pub use chat::{ChatHistory, ChatMessage, ChatRole};
pub use config::{
    CampaignConfig, Credentials, DashboardConfig, EmbeddingConfig, IngestConfig, LlmConfig,
    PipelineConfig, ServerConfig, UiConfig, VectorStoreConfig,
};
pub use trend::{
    parse_growth_rate, Metadata, TrendBar, TrendDocument, TrendRecord, TrendRow, GROWTH_RATE_KEY,
};
