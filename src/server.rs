//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::AppConfig;
use crate::services::PixelateService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pixelate: Arc<PixelateService>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.limits.max_upload_bytes == 0 {
        anyhow::bail!("limits.max_upload_bytes must be greater than zero");
    }
    let config = Arc::new(config);
    let pixelate = Arc::new(PixelateService::new(config.clone()));

    Ok(AppState { config, pixelate })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.limits.max_upload_bytes;

    Router::new()
        .route("/api/pixelate", post(handle_pixelate))
        .route("/api/palette", post(handle_palette))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        // Replace axum's 2 MB default with the configured upload limit
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_pixelate(
    State(state): State<AppState>,
    query: Result<
        axum::extract::Query<crate::models::RenderQuery>,
        axum::extract::rejection::QueryRejection,
    >,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> Result<axum::response::Response, ApiError> {
    api::handle_pixelate(State(state.pixelate), query, headers, body).await
}

async fn handle_palette(
    State(state): State<AppState>,
    query: Result<axum::extract::Query<api::PaletteQuery>, axum::extract::rejection::QueryRejection>,
    body: axum::body::Bytes,
) -> Result<axum::Json<api::PaletteResponse>, ApiError> {
    api::handle_palette(State(state.pixelate), query, body).await
}
