use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV header is missing required column: {0}")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Trend store error: {0}")]
    Store(#[from] campaign_store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
