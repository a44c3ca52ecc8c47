//! HTTP server.

use std::net::SocketAddr;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{router::create_router, state::ApiState};

pub const DEFAULT_BASE_PATH: &str = "/api";

/// Handle to a running server. Dropping it shuts the server down.
pub struct ApiServer {
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
    addr: SocketAddr,
}

impl ApiServer {
    /// Bind `host:port` and start serving in a background task.
    ///
    /// # Errors
    /// Returns an error if the address cannot be resolved or bound.
    pub async fn start(
        state: ApiState,
        host: &str,
        port: u16,
        base_path: &str,
    ) -> std::io::Result<Self> {
        let router = create_router(state, base_path)
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let listener = tokio::net::TcpListener::bind((host, port)).await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });

            if let Err(e) = server.await {
                tracing::error!("HTTP server error: {}", e);
            }
        });

        tracing::info!("HTTP server listening on http://{}{}", addr, base_path);

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
            addr,
        })
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request shutdown without waiting for it.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("HTTP server shutdown requested");
        }
    }

    /// Shut down and wait for in-flight requests to finish.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("HTTP server task failed: {}", e);
            }
        }
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
