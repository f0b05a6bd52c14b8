use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use campaign_models::{TrendDocument, TrendRecord};
use campaign_store::{IndexAdmin, IndexSpec, TrendStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::LoaderError;
use crate::source::read_trend_csv;

/// Summary printed by the loader binary once ingestion finishes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IngestReport {
    pub index: String,
    pub source: String,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub documents_upserted: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

/// Replaces the contents of the trend index with the rows of a CSV.
///
/// Not safe to run while anything else writes to the same index: the index is
/// destroyed before the new rows go in.
pub struct Ingestor {
    admin: Arc<dyn IndexAdmin>,
    store: Arc<dyn TrendStore>,
    spec: IndexSpec,
    settle: Duration,
}

impl Ingestor {
    pub fn new(admin: Arc<dyn IndexAdmin>, store: Arc<dyn TrendStore>, spec: IndexSpec) -> Self {
        Self {
            admin,
            store,
            spec,
            settle: Duration::ZERO,
        }
    }

    /// Wait this long after the final upsert before reporting.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Recreate the index and load `records` into it.
    pub async fn rebuild(&self, records: &[TrendRecord]) -> Result<usize, LoaderError> {
        info!(index = %self.spec.name, "Recreating index");
        self.admin.recreate(&self.spec).await?;

        let documents: Vec<TrendDocument> = records
            .iter()
            .cloned()
            .map(TrendRecord::into_document)
            .collect();
        if documents.is_empty() {
            info!(index = %self.spec.name, "No rows to load");
            return Ok(0);
        }

        let upserted = self.store.upsert(&documents).await?;
        info!(index = %self.spec.name, upserted, "Loaded trend documents");
        Ok(upserted)
    }

    /// Read `path`, rebuild the index from it and wait for the writes to settle.
    ///
    /// The file is fully parsed before the index is touched, so a missing or
    /// malformed file leaves the existing index alone.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport, LoaderError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let csv = read_trend_csv(path)?;
        let upserted = self.rebuild(&csv.records).await?;

        if !self.settle.is_zero() {
            info!(seconds = self.settle.as_secs_f64(), "Waiting for index to settle");
            tokio::time::sleep(self.settle).await;
        }

        Ok(IngestReport {
            index: self.spec.name.clone(),
            source: path.display().to_string(),
            rows_read: csv.records.len(),
            rows_skipped: csv.skipped,
            documents_upserted: upserted,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_models::config::VectorStoreConfig;
    use campaign_store::test_support::HashingEmbedder;
    use campaign_store::MemoryTrendStore;

    fn ingestor(store: &Arc<MemoryTrendStore>) -> Ingestor {
        Ingestor::new(
            store.clone(),
            store.clone(),
            IndexSpec::from(&VectorStoreConfig::default()),
        )
    }

    fn record(trend: &str, rate: Option<&str>) -> TrendRecord {
        TrendRecord {
            trend: trend.to_string(),
            description: "desc".to_string(),
            growth_rate: rate.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_contents() {
        let store = Arc::new(MemoryTrendStore::new(
            "campaign-trends",
            Arc::new(HashingEmbedder::new(32)),
        ));
        let ingestor = ingestor(&store);

        ingestor.rebuild(&[record("A", Some("1%")), record("B", None)]).await.unwrap();
        assert_eq!(store.len().await, 2);

        let count = ingestor.rebuild(&[record("C", Some("3%"))]).await.unwrap();
        assert_eq!(count, 1);
        let docs = store.documents().await;
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "C: desc");
    }

    #[tokio::test]
    async fn rebuild_creates_missing_index() {
        let store = Arc::new(MemoryTrendStore::without_index(
            "campaign-trends",
            Arc::new(HashingEmbedder::new(32)),
        ));

        let count = ingestor(&store).rebuild(&[]).await.unwrap();
        assert_eq!(count, 0);
        assert!(store.is_empty().await);
        assert!(store.search("anything", 3).await.unwrap().is_empty());
    }
}
