//! HTTP boundary for Dockyard.
//!
//! A thin axum adapter over [`dockyard_core::Orchestrator`]:
//!
//! - `GET  <base>/modules`   docked modules
//! - `GET  <base>/templates` template names
//! - `POST <base>/dock`      dock a module non-interactively
//! - `GET  <base>/health`    liveness probe
//!
//! Errors are returned as `{"error": "..."}` with a status code derived from
//! [`dockyard_core::ErrorKind`].

pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod types;

pub use router::create_router;
pub use server::{ApiServer, DEFAULT_BASE_PATH};
pub use state::ApiState;
pub use types::{ApiError, DockResponse, HealthResponse};
