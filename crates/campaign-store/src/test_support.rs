//! Test support: a deterministic embedder for exercising similarity search
//! without the hosted embeddings service.

use async_trait::async_trait;

use crate::embed::Embedder;
use crate::error::StoreError;

/// Bag-of-words embedder: each lowercase alphanumeric token is hashed into
/// one of `dimension` buckets. Texts sharing words score as similar.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let bucket = (fnv1a(&token) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(0xcbf2_9ce4_8422_2325u64, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }
}

/// Embedder that always fails, for exercising error propagation.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed_documents(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, StoreError> {
        Err(StoreError::Embedding("embedding service unreachable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_vector() {
        let embedder = HashingEmbedder::new(32);
        assert_eq!(embedder.embed("Reusable Packaging"), embedder.embed("reusable packaging"));
    }

    #[test]
    fn counts_tokens() {
        let embedder = HashingEmbedder::new(16);
        let v = embedder.embed("eco eco eco");
        assert_eq!(v.iter().sum::<f32>(), 3.0);
    }
}
