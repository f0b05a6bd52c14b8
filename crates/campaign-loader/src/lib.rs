pub mod error;
pub mod ingest;
pub mod source;

pub use error::LoaderError;
pub use ingest::{IngestReport, Ingestor};
pub use source::{read_trend_csv, TrendCsv, REQUIRED_COLUMNS};
