use std::sync::Arc;

use campaign_models::TrendDocument;
use campaign_store::TrendStore;
use tracing::info;

use crate::error::AgentError;
use crate::llm::LanguageModel;
use crate::prompts::{idea_prompt, optimization_prompt, trend_block};

/// Default number of trend documents handed to the optimizer.
pub const DEFAULT_TREND_K: usize = 3;

/// Asks the language model for one creative product idea.
pub struct IdeaGenerationAgent {
    llm: Arc<dyn LanguageModel>,
}

impl IdeaGenerationAgent {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub async fn generate(&self, query: &str) -> Result<String, AgentError> {
        info!(query, "Generating idea");
        self.llm.complete(&idea_prompt(query)).await
    }
}

/// Pulls the top-k trend documents for a query. No filtering or reranking.
pub struct TrendRetrievalAgent {
    store: Arc<dyn TrendStore>,
    k: usize,
}

impl TrendRetrievalAgent {
    pub fn new(store: Arc<dyn TrendStore>) -> Self {
        Self::with_k(store, DEFAULT_TREND_K)
    }

    pub fn with_k(store: Arc<dyn TrendStore>, k: usize) -> Self {
        Self { store, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<TrendDocument>, AgentError> {
        info!(query, k = self.k, "Retrieving trends");
        let trends = self.store.search(query, self.k).await?;
        info!(count = trends.len(), "Retrieved trends");
        Ok(trends)
    }
}

/// Turns an idea plus supporting trends into a channel and tactics plan.
pub struct OptimizationAgent {
    llm: Arc<dyn LanguageModel>,
}

impl OptimizationAgent {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub async fn optimize(
        &self,
        idea: &str,
        trends: &[TrendDocument],
    ) -> Result<String, AgentError> {
        info!(trend_count = trends.len(), "Optimizing campaign");
        let prompt = optimization_prompt(idea, &trend_block(trends));
        self.llm.complete(&prompt).await
    }
}
