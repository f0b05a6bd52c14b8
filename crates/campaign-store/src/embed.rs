use async_trait::async_trait;
use campaign_models::config::{EmbeddingConfig, OPENAI_API_KEY_ENV};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// Turns text into vectors for similarity search. Mockable for testing.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of documents, returning one vector per input in order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Embedding("no vector returned for query".to_string()))
    }
}

/// Embedder backed by the hosted OpenAI embeddings endpoint.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: Option<String>,
    config: EmbeddingConfig,
}

impl OpenAiEmbedder {
    pub fn new(api_key: Option<String>, config: EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn request_batch(
        &self,
        api_key: &str,
        input: &[String],
    ) -> Result<Vec<Vec<f32>>, StoreError> {
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&EmbeddingRequest {
                model: &self.config.model,
                input,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::from_response("OpenAI embeddings", response).await);
        }

        let mut parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != input.len() {
            return Err(StoreError::Embedding(format!(
                "expected {} vectors, got {}",
                input.len(),
                parsed.data.len()
            )));
        }
        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(StoreError::MissingCredential(OPENAI_API_KEY_ENV))?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size.max(1)) {
            debug!(model = %self.config.model, count = chunk.len(), "Requesting embeddings");
            vectors.extend(self.request_batch(api_key, chunk).await?);
        }
        Ok(vectors)
    }
}
