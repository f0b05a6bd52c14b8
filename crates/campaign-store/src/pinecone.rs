use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use campaign_models::config::{VectorStoreConfig, PINECONE_API_KEY_ENV};
use campaign_models::{Metadata, TrendDocument};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::embed::Embedder;
use crate::error::StoreError;
use crate::store::{IndexAdmin, IndexSpec, TrendStore};

/// Metadata key the document content is stored under in the hosted index.
pub const TEXT_KEY: &str = "text";

const SERVICE: &str = "Pinecone";

/// Client for a hosted Pinecone serverless index.
///
/// Control-plane calls (list/describe/create/delete) go to
/// `control_plane_url`; queries and upserts go to the index's own host,
/// which is discovered with a describe call on first use and remembered.
pub struct PineconeClient {
    http: reqwest::Client,
    api_key: Option<String>,
    config: VectorStoreConfig,
    embedder: Arc<dyn Embedder>,
    upsert_batch_size: usize,
    host: RwLock<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<VectorRecord<'a>>,
}

#[derive(Serialize)]
struct VectorRecord<'a> {
    id: String,
    values: &'a [f32],
    metadata: Metadata,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

impl PineconeClient {
    pub fn new(
        api_key: Option<String>,
        config: VectorStoreConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        let host = config.host_override.clone();
        Self {
            http: reqwest::Client::new(),
            api_key,
            config,
            embedder,
            upsert_batch_size: 64,
            host: RwLock::new(host),
        }
    }

    pub fn with_upsert_batch_size(mut self, batch_size: usize) -> Self {
        self.upsert_batch_size = batch_size.max(1);
        self
    }

    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    fn api_key(&self) -> Result<&str, StoreError> {
        self.api_key
            .as_deref()
            .ok_or(StoreError::MissingCredential(PINECONE_API_KEY_ENV))
    }

    fn request(&self, method: Method, url: String) -> Result<RequestBuilder, StoreError> {
        let api_key = self.api_key()?;
        Ok(self
            .http
            .request(method, url)
            .header("Api-Key", api_key)
            .header("X-Pinecone-API-Version", &self.config.api_version))
    }

    fn control(&self, method: Method, path: &str) -> Result<RequestBuilder, StoreError> {
        let base = self.config.control_plane_url.trim_end_matches('/');
        self.request(method, format!("{base}{path}"))
    }

    pub async fn list_indexes(&self) -> Result<Vec<String>, StoreError> {
        let response = self.control(Method::GET, "/indexes")?.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::from_response(SERVICE, response).await);
        }
        let list: IndexList = response.json().await?;
        Ok(list.indexes.into_iter().map(|i| i.name).collect())
    }

    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription, StoreError> {
        let response = self
            .control(Method::GET, &format!("/indexes/{name}"))?
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::IndexNotFound(name.to_string()));
        }
        if !response.status().is_success() {
            return Err(StoreError::from_response(SERVICE, response).await);
        }
        Ok(response.json().await?)
    }

    pub async fn delete_index(&self, name: &str) -> Result<(), StoreError> {
        let response = self
            .control(Method::DELETE, &format!("/indexes/{name}"))?
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::IndexNotFound(name.to_string()));
        }
        if !response.status().is_success() {
            return Err(StoreError::from_response(SERVICE, response).await);
        }
        Ok(())
    }

    pub async fn create_index(&self, spec: &IndexSpec) -> Result<(), StoreError> {
        let body = CreateIndexRequest {
            name: &spec.name,
            dimension: spec.dimension,
            metric: &spec.metric,
            spec: serde_json::json!({
                "serverless": { "cloud": spec.cloud, "region": spec.region }
            }),
        };
        let response = self
            .control(Method::POST, "/indexes")?
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StoreError::from_response(SERVICE, response).await);
        }
        Ok(())
    }

    async fn wait_until_ready(&self, name: &str) -> Result<IndexDescription, StoreError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.ready_timeout_seconds);
        let poll = Duration::from_millis(self.config.ready_poll_millis);
        loop {
            let description = self.describe_index(name).await?;
            if description.status.ready {
                return Ok(description);
            }
            debug!(index = name, state = %description.status.state, "Waiting for index");
            if Instant::now() >= deadline {
                return Err(StoreError::IndexNotReady {
                    name: name.to_string(),
                    waited_seconds: self.config.ready_timeout_seconds,
                });
            }
            tokio::time::sleep(poll).await;
        }
    }

    async fn wait_until_deleted(&self, name: &str) -> Result<(), StoreError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.ready_timeout_seconds);
        let poll = Duration::from_millis(self.config.ready_poll_millis);
        loop {
            match self.describe_index(name).await {
                Err(StoreError::IndexNotFound(_)) => return Ok(()),
                Err(e) => return Err(e),
                Ok(_) if Instant::now() >= deadline => {
                    return Err(StoreError::IndexNotReady {
                        name: name.to_string(),
                        waited_seconds: self.config.ready_timeout_seconds,
                    });
                }
                Ok(_) => tokio::time::sleep(poll).await,
            }
        }
    }

    /// Base URL of the index's data plane.
    async fn data_url(&self) -> Result<String, StoreError> {
        if let Some(host) = self.host.read().await.as_ref() {
            return Ok(host_url(host));
        }
        let description = self.describe_index(&self.config.index_name).await?;
        let url = host_url(&description.host);
        *self.host.write().await = Some(description.host);
        Ok(url)
    }
}

fn host_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn match_to_document(m: QueryMatch) -> Option<TrendDocument> {
    let mut metadata = m.metadata.unwrap_or_default();
    match metadata.remove(TEXT_KEY) {
        Some(serde_json::Value::String(content)) => Some(TrendDocument { content, metadata }),
        _ => {
            warn!(id = %m.id, "Match has no text metadata, skipping");
            None
        }
    }
}

#[async_trait]
impl TrendStore for PineconeClient {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<TrendDocument>, StoreError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed_query(query).await?;
        let url = format!("{}/query", self.data_url().await?);
        let response = self
            .request(Method::POST, url)?
            .json(&QueryRequest {
                vector: &vector,
                top_k: k,
                include_metadata: true,
                include_values: false,
            })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::IndexNotFound(self.config.index_name.clone()));
        }
        if !response.status().is_success() {
            return Err(StoreError::from_response(SERVICE, response).await);
        }

        let mut parsed: QueryResponse = response.json().await?;
        parsed
            .matches
            .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let documents: Vec<TrendDocument> = parsed
            .matches
            .into_iter()
            .take(k)
            .filter_map(match_to_document)
            .collect();

        debug!(query, k, found = documents.len(), "Similarity search complete");
        Ok(documents)
    }

    async fn upsert(&self, documents: &[TrendDocument]) -> Result<usize, StoreError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;
        let url = format!("{}/vectors/upsert", self.data_url().await?);

        let mut upserted = 0;
        let pairs: Vec<(&TrendDocument, &Vec<f32>)> =
            documents.iter().zip(vectors.iter()).collect();
        for batch in pairs.chunks(self.upsert_batch_size) {
            let vectors = batch
                .iter()
                .map(|(doc, values)| {
                    let mut metadata = doc.metadata.clone();
                    metadata.insert(
                        TEXT_KEY.to_string(),
                        serde_json::Value::String(doc.content.clone()),
                    );
                    VectorRecord {
                        id: Uuid::new_v4().to_string(),
                        values: values.as_slice(),
                        metadata,
                    }
                })
                .collect();

            let response = self
                .request(Method::POST, url.clone())?
                .json(&UpsertRequest { vectors })
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(StoreError::from_response(SERVICE, response).await);
            }
            let parsed: UpsertResponse = response.json().await?;
            upserted += parsed.upserted_count;
        }

        info!(index = %self.config.index_name, upserted, "Upsert complete");
        Ok(upserted)
    }
}

#[async_trait]
impl IndexAdmin for PineconeClient {
    async fn recreate(&self, spec: &IndexSpec) -> Result<(), StoreError> {
        info!(index = %spec.name, "Checking index");
        if self.list_indexes().await?.iter().any(|n| n == &spec.name) {
            info!(index = %spec.name, "Deleting existing index");
            self.delete_index(&spec.name).await?;
            self.wait_until_deleted(&spec.name).await?;
        }

        info!(
            index = %spec.name,
            dimension = spec.dimension,
            metric = %spec.metric,
            "Creating index"
        );
        self.create_index(spec).await?;
        let description = self.wait_until_ready(&spec.name).await?;

        if spec.name == self.config.index_name && self.config.host_override.is_none() {
            *self.host.write().await = Some(description.host);
        }
        info!(index = %spec.name, "Index ready");
        Ok(())
    }
}
