use serde::{Deserialize, Serialize};

use crate::chat::DEFAULT_HISTORY_CAP;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const PINECONE_API_KEY_ENV: &str = "PINECONE_API_KEY";

/// Top-level configuration shared by the `campaign` and `campaign-loader` binaries.
///
/// Every section falls back to its defaults, so an empty file (or none at all) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CampaignConfig {
    pub llm: LlmConfig,
    pub embeddings: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub pipeline: PipelineConfig,
    pub dashboard: DashboardConfig,
    pub ui: UiConfig,
    pub server: ServerConfig,
    pub ingest: IngestConfig,
}

/// Chat completion model used by the idea and optimization agents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub base_url: String,
    /// Maximum number of texts sent in one embeddings request.
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            batch_size: 1000,
        }
    }
}

/// Hosted vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub index_name: String,
    /// Control-plane endpoint used to list, describe, create and delete indexes.
    pub control_plane_url: String,
    pub api_version: String,
    pub dimension: usize,
    pub metric: String,
    pub cloud: String,
    pub region: String,
    /// Skip host discovery and talk to this data-plane URL directly.
    pub host_override: Option<String>,
    /// How long ingestion waits for a freshly created index to report ready.
    pub ready_timeout_seconds: u64,
    pub ready_poll_millis: u64,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            index_name: "campaign-trends".to_string(),
            control_plane_url: "https://api.pinecone.io".to_string(),
            api_version: "2024-07".to_string(),
            dimension: 1536,
            metric: "cosine".to_string(),
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            host_override: None,
            ready_timeout_seconds: 300,
            ready_poll_millis: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of trend documents the retrieval agent hands to the optimizer.
    pub trend_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { trend_k: 3 }
    }
}

/// Background trend dashboard. The topic is fixed and independent of user queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub topic: String,
    pub table_k: usize,
    pub chart_k: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            topic: "e-commerce trends".to_string(),
            table_k: 10,
            chart_k: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub history_cap: usize,
    /// Sessions idle for longer than this are dropped along with their history.
    pub session_idle_seconds: u64,
    pub max_sessions: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            history_cap: DEFAULT_HISTORY_CAP,
            session_idle_seconds: 3600,
            max_sessions: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub api_addr: String,
    pub ui_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_addr: "0.0.0.0:8080".to_string(),
            ui_addr: "0.0.0.0:7860".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    pub csv_path: String,
    pub upsert_batch_size: usize,
    /// Delay after the final upsert so the hosted index reflects the writes.
    pub settle_seconds: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            csv_path: "campaign_data.csv".to_string(),
            upsert_batch_size: 64,
            settle_seconds: 5,
        }
    }
}

/// API credentials for the hosted services.
///
/// Missing values are allowed at startup; clients report them on first use.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub pinecone_api_key: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: non_empty(OPENAI_API_KEY_ENV),
            pinecone_api_key: non_empty(PINECONE_API_KEY_ENV),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &self.openai_api_key.is_some())
            .field("pinecone_api_key", &self.pinecone_api_key.is_some())
            .finish()
    }
}
