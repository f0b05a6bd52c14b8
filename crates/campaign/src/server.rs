use anyhow::{Context, Result};
use axum::Router;
use campaign_models::config::{ServerConfig, UiConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::api_router;
use crate::session::SessionStore;
use crate::ui::{ui_router, UiState};
use crate::Services;

/// Build both routers with tracing and CORS layers applied.
pub fn routers(services: &Services, ui: &UiConfig) -> (Router, Router) {
    let api = api_router(services.pipeline.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());
    let ui = ui_router(UiState {
        pipeline: services.pipeline.clone(),
        dashboard: services.dashboard.clone(),
        sessions: SessionStore::new(ui),
    })
    .layer(TraceLayer::new_for_http());
    (api, ui)
}

/// Run the API and UI listeners until `cancel` fires.
pub async fn serve(
    services: Services,
    server: &ServerConfig,
    ui: &UiConfig,
    cancel: CancellationToken,
) -> Result<()> {
    let (api, ui) = routers(&services, ui);

    let api_listener = TcpListener::bind(server.api_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind API listener on {}", server.api_addr))?;
    let ui_listener = TcpListener::bind(server.ui_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind UI listener on {}", server.ui_addr))?;

    info!(addr = %server.api_addr, "API listening");
    info!(addr = %server.ui_addr, "UI listening");

    let api_server = axum::serve(api_listener, api)
        .with_graceful_shutdown(cancel.clone().cancelled_owned());
    let ui_server = axum::serve(ui_listener, ui)
        .with_graceful_shutdown(cancel.cancelled_owned());

    tokio::try_join!(
        async { api_server.await.context("API server error") },
        async { ui_server.await.context("UI server error") },
    )?;

    info!("Servers shut down gracefully");
    Ok(())
}
