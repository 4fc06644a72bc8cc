use api_types::health::{AppInfo, HealthCheck};
use axum::{Json, extract::State, http::StatusCode};

use crate::{docs::DOCS_PATH, server::ServerState};

#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses((status = 200, description = "Name, version and docs location", body = AppInfo))
)]
pub async fn root(State(state): State<ServerState>) -> Json<AppInfo> {
    let config = &state.config;
    Json(AppInfo {
        message: format!("{} is running", config.app_name),
        version: config.app_version.clone(),
        docs: DOCS_PATH.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses(
        (status = 200, description = "Store reachable", body = HealthCheck),
        (status = 503, description = "Store unreachable", body = HealthCheck),
    )
)]
pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthCheck>) {
    match state.engine.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthCheck::healthy())),
        Err(err) => {
            tracing::error!("database health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthCheck::unhealthy()),
            )
        }
    }
}
