pub mod dashboard;
pub mod embed;
pub mod error;
pub mod memory;
pub mod pinecone;
pub mod store;

pub mod test_support;

pub use dashboard::TrendDashboard;
pub use embed::{Embedder, OpenAiEmbedder};
pub use error::StoreError;
pub use memory::MemoryTrendStore;
pub use pinecone::PineconeClient;
pub use store::{IndexAdmin, IndexSpec, TrendStore};
