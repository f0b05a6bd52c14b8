use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} API error ({status}): {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Index {name} not ready after {waited_seconds} seconds")]
    IndexNotReady { name: String, waited_seconds: u64 },

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Build an API error from a non-success response, preferring the
    /// service's own `error.message` text when the body carries one.
    pub(crate) async fn from_response(service: &'static str, response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        StoreError::Api {
            service,
            status,
            message,
        }
    }
}
