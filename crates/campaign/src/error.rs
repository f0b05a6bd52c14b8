use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campaign_agents::AgentError;
use campaign_store::StoreError;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Failures surfaced by the HTTP and UI handlers, rendered as plain text.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("{0}")]
    Agent(#[from] AgentError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Unknown session: {0}")]
    SessionNotFound(Uuid),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Agent(AgentError::EmptyQuery) => StatusCode::BAD_REQUEST,
            HttpError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Agent(_) | HttpError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "Request failed");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            HttpError::from(AgentError::EmptyQuery).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::from(AgentError::EmptyCompletion).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HttpError::from(StoreError::IndexNotFound("campaign-trends".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HttpError::SessionNotFound(Uuid::nil()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
