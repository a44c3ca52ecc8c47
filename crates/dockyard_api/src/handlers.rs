//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use dockyard_core::{Module, ModuleConfig};
use dockyard_templates::MapValueSource;
use tracing::{info, warn};

use crate::state::ApiState;
use crate::types::{failure, ApiError, ApiFailure, DockResponse, HealthResponse};

/// GET /modules - List docked modules.
pub async fn list_modules(State(state): State<ApiState>) -> Result<Json<Vec<Module>>, ApiFailure> {
    state.orchestrator.list_modules().map(Json).map_err(|e| {
        warn!("Failed to list modules: {}", e);
        failure(&e)
    })
}

/// GET /templates - List template names.
pub async fn list_templates(
    State(state): State<ApiState>,
) -> Result<Json<Vec<String>>, ApiFailure> {
    state.orchestrator.list_templates().map(Json).map_err(|e| {
        warn!("Failed to list templates: {}", e);
        failure(&e)
    })
}

/// POST /dock - Dock a module.
///
/// There is nobody to prompt, so placeholders not covered by `env_vars`
/// keep their `<name>` sentinel.
pub async fn dock(
    State(state): State<ApiState>,
    body: Result<Json<ModuleConfig>, JsonRejection>,
) -> Result<Json<DockResponse>, ApiFailure> {
    let Json(request) = body.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(rejection.body_text())),
        )
    })?;

    let mut source = MapValueSource::empty();
    let report = state
        .orchestrator
        .dock(&request, &mut source)
        .await
        .map_err(|e| {
            warn!("Dock of {} failed: {}", request.name, e);
            failure(&e)
        })?;

    info!("Docked {} via HTTP", report.module);
    Ok(Json(DockResponse::success(format!(
        "Module {} docked successfully",
        report.module
    ))))
}

/// GET /health - Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}
