pub mod agents;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompts;

pub mod test_support;

pub use agents::{IdeaGenerationAgent, OptimizationAgent, TrendRetrievalAgent, DEFAULT_TREND_K};
pub use error::AgentError;
pub use llm::{LanguageModel, OpenAiChat};
pub use pipeline::CampaignPipeline;
