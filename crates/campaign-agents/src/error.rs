use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Language model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Language model returned an empty completion")]
    EmptyCompletion,

    #[error("Trend store error: {0}")]
    Store(#[from] campaign_store::StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
