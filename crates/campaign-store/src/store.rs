use async_trait::async_trait;
use campaign_models::config::VectorStoreConfig;
use campaign_models::TrendDocument;

use crate::error::StoreError;

/// Similarity search over stored trend documents. Mockable for testing.
#[async_trait]
pub trait TrendStore: Send + Sync {
    /// Return at most `k` documents ranked by descending similarity to `query`.
    /// An empty result means no trends matched; it is not an error.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<TrendDocument>, StoreError>;

    /// Insert documents, returning how many the store accepted.
    async fn upsert(&self, documents: &[TrendDocument]) -> Result<usize, StoreError>;
}

/// Shape of the vector index created by ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    pub cloud: String,
    pub region: String,
}

impl From<&VectorStoreConfig> for IndexSpec {
    fn from(config: &VectorStoreConfig) -> Self {
        Self {
            name: config.index_name.clone(),
            dimension: config.dimension,
            metric: config.metric.clone(),
            cloud: config.cloud.clone(),
            region: config.region.clone(),
        }
    }
}

/// Index lifecycle operations used by ingestion.
#[async_trait]
pub trait IndexAdmin: Send + Sync {
    /// Destroy the index if it exists, then create it empty and wait until it is usable.
    async fn recreate(&self, spec: &IndexSpec) -> Result<(), StoreError>;
}
