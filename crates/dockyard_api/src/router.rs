//! Route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, state::ApiState};

/// Build the router with every route mounted under `base_path`.
///
/// An empty or `/` base path mounts the routes at the root.
pub fn create_router(state: ApiState, base_path: &str) -> Router {
    let routes = Router::new()
        .route("/modules", get(handlers::list_modules))
        .route("/templates", get(handlers::list_templates))
        .route("/dock", post(handlers::dock))
        .route("/health", get(handlers::health))
        .with_state(state);

    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        routes
    } else if base.starts_with('/') {
        Router::new().nest(base, routes)
    } else {
        Router::new().nest(&format!("/{}", base), routes)
    }
}
