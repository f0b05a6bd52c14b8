//! Interactive page and the JSON endpoints behind it.
//!
//! Each browser tab creates a session on load and sends its id with every
//! submission, so chat histories never mix between tabs.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use campaign_agents::CampaignPipeline;
use campaign_models::{CampaignOutcome, ChatMessage, TrendBar};
use campaign_store::TrendDashboard;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::HttpError;
use crate::session::SessionStore;

const INDEX_HTML: &str = include_str!("../assets/index.html");

pub const TABLE_COLUMNS: [&str; 2] = ["Trend", "Growth Rate"];
pub const MISSING_RATE: &str = "N/A";
pub const CHART_TITLE: &str = "Top E-Commerce Trend Growth Rates";
pub const CHART_Y_LABEL: &str = "Growth Rate (%)";

#[derive(Clone)]
pub struct UiState {
    pub pipeline: Arc<CampaignPipeline>,
    pub dashboard: Arc<TrendDashboard>,
    pub sessions: SessionStore,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub outcome: CampaignOutcome,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendTable {
    pub columns: Vec<String>,
    pub rows: Vec<[String; 2]>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrendChart {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<TrendBar>,
}

pub fn ui_router(state: UiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ui/sessions", post(create_session))
        .route("/ui/sessions/{id}", delete(end_session))
        .route("/ui/sessions/{id}/submit", post(submit))
        .route("/ui/sessions/{id}/clear", post(clear))
        .route("/ui/sessions/{id}/history", get(history))
        .route("/ui/trends/table", get(trend_table))
        .route("/ui/trends/chart", get(trend_chart))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn create_session(State(state): State<UiState>) -> Json<SessionCreated> {
    Json(SessionCreated {
        session_id: state.sessions.create().await,
    })
}

async fn end_session(
    State(state): State<UiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HttpError::SessionNotFound(id))
    }
}

/// POST /ui/sessions/{id}/submit - run the pipeline and record the exchange
async fn submit(
    State(state): State<UiState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, HttpError> {
    let history = state
        .sessions
        .get(&id)
        .await
        .ok_or(HttpError::SessionNotFound(id))?;

    info!(session = %id, query = %request.query, "UI submission");
    let outcome = state.pipeline.run(&request.query).await?;

    let mut history = history.lock().await;
    history.push_exchange(&request.query, &outcome.campaign_plan);
    Ok(Json(SubmitResponse {
        outcome,
        history: history.messages(),
    }))
}

async fn clear(
    State(state): State<UiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, HttpError> {
    let history = state
        .sessions
        .get(&id)
        .await
        .ok_or(HttpError::SessionNotFound(id))?;
    let mut history = history.lock().await;
    history.clear();
    Ok(Json(HistoryResponse {
        history: history.messages(),
    }))
}

async fn history(
    State(state): State<UiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, HttpError> {
    let history = state
        .sessions
        .get(&id)
        .await
        .ok_or(HttpError::SessionNotFound(id))?;
    let messages = history.lock().await.messages();
    Ok(Json(HistoryResponse { history: messages }))
}

async fn trend_table(State(state): State<UiState>) -> Result<Json<TrendTable>, HttpError> {
    let rows = state
        .dashboard
        .table()
        .await?
        .into_iter()
        .map(|row| {
            [
                row.name,
                row.growth_rate.unwrap_or_else(|| MISSING_RATE.to_string()),
            ]
        })
        .collect();
    Ok(Json(TrendTable {
        columns: TABLE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }))
}

async fn trend_chart(State(state): State<UiState>) -> Result<Json<TrendChart>, HttpError> {
    let bars = state.dashboard.chart().await?;
    Ok(Json(TrendChart {
        title: CHART_TITLE.to_string(),
        y_label: CHART_Y_LABEL.to_string(),
        bars,
    }))
}
