use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use campaign_agents::CampaignPipeline;
use campaign_models::CampaignOutcome;
use tracing::info;

use crate::error::HttpError;

/// Router for the programmatic endpoint.
pub fn api_router(pipeline: Arc<CampaignPipeline>) -> Router {
    Router::new()
        .route("/generate/{query}", get(generate))
        .with_state(pipeline)
}

/// GET /generate/{query} - run the pipeline once
async fn generate(
    State(pipeline): State<Arc<CampaignPipeline>>,
    Path(query): Path<String>,
) -> Result<Json<CampaignOutcome>, HttpError> {
    info!(query = %query, "API generate request");
    let outcome = pipeline.run(&query).await?;
    Ok(Json(outcome))
}
