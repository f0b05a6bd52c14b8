use std::sync::Arc;

use async_trait::async_trait;
use campaign_models::TrendDocument;
use tokio::sync::RwLock;

use crate::embed::Embedder;
use crate::error::StoreError;
use crate::store::{IndexAdmin, IndexSpec, TrendStore};

struct Entry {
    document: TrendDocument,
    vector: Vec<f32>,
}

/// In-process vector index with brute-force cosine ranking.
///
/// Stands in for the hosted index in tests. `None` models an index that
/// does not exist, so searches fail the same way the hosted client does.
pub struct MemoryTrendStore {
    name: String,
    embedder: Arc<dyn Embedder>,
    entries: RwLock<Option<Vec<Entry>>>,
}

impl MemoryTrendStore {
    /// An existing, empty index.
    pub fn new(name: &str, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            name: name.to_string(),
            embedder,
            entries: RwLock::new(Some(Vec::new())),
        }
    }

    /// A store whose index has not been created yet.
    pub fn without_index(name: &str, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            name: name.to_string(),
            embedder,
            entries: RwLock::new(None),
        }
    }

    /// Number of stored documents (zero when the index does not exist).
    pub async fn len(&self) -> usize {
        self.entries.read().await.as_ref().map_or(0, Vec::len)
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All stored documents in insertion order.
    pub async fn documents(&self) -> Vec<TrendDocument> {
        self.entries
            .read()
            .await
            .as_ref()
            .map(|entries| entries.iter().map(|e| e.document.clone()).collect())
            .unwrap_or_default()
    }
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[async_trait]
impl TrendStore for MemoryTrendStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<TrendDocument>, StoreError> {
        let vector = self.embedder.embed_query(query).await?;

        let guard = self.entries.read().await;
        let entries = guard
            .as_ref()
            .ok_or_else(|| StoreError::IndexNotFound(self.name.clone()))?;

        let mut scored: Vec<(f32, &Entry)> = entries
            .iter()
            .map(|e| (cosine_similarity(&vector, &e.vector), e))
            .collect();
        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, e)| e.document.clone())
            .collect())
    }

    async fn upsert(&self, documents: &[TrendDocument]) -> Result<usize, StoreError> {
        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(StoreError::Embedding(format!(
                "expected {} vectors, got {}",
                documents.len(),
                vectors.len()
            )));
        }

        let mut guard = self.entries.write().await;
        let entries = guard
            .as_mut()
            .ok_or_else(|| StoreError::IndexNotFound(self.name.clone()))?;
        entries.extend(
            documents
                .iter()
                .cloned()
                .zip(vectors)
                .map(|(document, vector)| Entry { document, vector }),
        );
        Ok(documents.len())
    }
}

#[async_trait]
impl IndexAdmin for MemoryTrendStore {
    async fn recreate(&self, _spec: &IndexSpec) -> Result<(), StoreError> {
        *self.entries.write().await = Some(Vec::new());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::HashingEmbedder;
    use campaign_models::{Metadata, TrendRecord};

    fn store() -> MemoryTrendStore {
        MemoryTrendStore::new("campaign-trends", Arc::new(HashingEmbedder::new(64)))
    }

    fn record(trend: &str, description: &str, rate: &str) -> TrendDocument {
        TrendRecord {
            trend: trend.to_string(),
            description: description.to_string(),
            growth_rate: Some(rate.to_string()),
        }
        .into_document()
    }

    #[test]
    fn cosine_of_parallel_and_orthogonal() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn search_ranks_most_similar_first_and_respects_k() {
        let store = store();
        store
            .upsert(&[
                record("Live Shopping", "Streaming storefronts", "9%"),
                record("Reusable Packaging", "Growing demand", "18%"),
                record("Voice Commerce", "Smart speaker orders", "5%"),
            ])
            .await
            .unwrap();

        let docs = store.search("packaging", 2).await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Reusable Packaging: Growing demand");
        assert_eq!(docs[0].metadata.get("growth_rate"), Some(&serde_json::json!("18%")));
    }

    #[tokio::test]
    async fn results_only_contain_stored_documents() {
        let store = store();
        let stored = vec![
            record("A", "alpha", "1%"),
            TrendDocument::new("B: beta", Metadata::new()),
        ];
        store.upsert(&stored).await.unwrap();

        let docs = store.search("anything at all", 10).await.unwrap();
        assert!(docs.len() <= 10);
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| stored.contains(d)));
    }

    #[tokio::test]
    async fn empty_index_returns_empty_result() {
        assert!(store().search("packaging", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_index_is_an_error() {
        let store =
            MemoryTrendStore::without_index("campaign-trends", Arc::new(HashingEmbedder::new(8)));
        let err = store.search("x", 3).await.unwrap_err();
        assert!(matches!(err, StoreError::IndexNotFound(_)));
        assert!(store.upsert(&[record("A", "a", "1%")]).await.is_err());
    }

    /// Returns one vector fewer than asked for.
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
            Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
        }
    }

    #[tokio::test]
    async fn upsert_rejects_vector_count_mismatch() {
        let store = MemoryTrendStore::new("campaign-trends", Arc::new(ShortEmbedder));

        let err = store
            .upsert(&[record("A", "a", "1%"), record("B", "b", "2%")])
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Embedding(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn recreate_discards_prior_content() {
        let store = store();
        store.upsert(&[record("A", "a", "1%")]).await.unwrap();
        assert_eq!(store.len().await, 1);

        let spec = IndexSpec::from(&campaign_models::VectorStoreConfig::default());
        store.recreate(&spec).await.unwrap();
        assert!(store.is_empty().await);
    }
}
