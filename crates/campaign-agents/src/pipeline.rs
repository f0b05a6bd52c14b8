use std::sync::Arc;
use std::time::Instant;

use campaign_models::CampaignOutcome;
use campaign_store::TrendStore;
use tracing::info;

use crate::agents::{IdeaGenerationAgent, OptimizationAgent, TrendRetrievalAgent};
use crate::error::AgentError;
use crate::llm::LanguageModel;

/// Runs the three agents for one query and packages their output.
///
/// Idea generation and trend retrieval are independent and run concurrently;
/// optimization starts only once both have finished. Any failure aborts the
/// whole run with no partial outcome, but only after the sibling call has
/// finished too.
pub struct CampaignPipeline {
    ideas: IdeaGenerationAgent,
    retrieval: TrendRetrievalAgent,
    optimizer: OptimizationAgent,
}

impl CampaignPipeline {
    pub fn new(
        ideas: IdeaGenerationAgent,
        retrieval: TrendRetrievalAgent,
        optimizer: OptimizationAgent,
    ) -> Self {
        Self {
            ideas,
            retrieval,
            optimizer,
        }
    }

    /// Wire all three agents to one model and one trend store.
    pub fn from_parts(
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn TrendStore>,
        trend_k: usize,
    ) -> Self {
        Self::new(
            IdeaGenerationAgent::new(Arc::clone(&llm)),
            TrendRetrievalAgent::with_k(store, trend_k),
            OptimizationAgent::new(llm),
        )
    }

    pub async fn run(&self, query: &str) -> Result<CampaignOutcome, AgentError> {
        if query.trim().is_empty() {
            return Err(AgentError::EmptyQuery);
        }

        let start = Instant::now();
        info!(query, "Starting campaign run");

        // Both calls always run to completion, even when the other fails.
        let (idea, trends) = tokio::join!(
            self.ideas.generate(query),
            self.retrieval.retrieve(query)
        );
        let idea = idea?;
        let trends = trends?;

        let campaign_plan = self.optimizer.optimize(&idea, &trends).await?;

        info!(
            trend_count = trends.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Campaign run complete"
        );

        Ok(CampaignOutcome {
            idea,
            trends: trends.into_iter().map(|t| t.content).collect(),
            campaign_plan,
        })
    }
}
