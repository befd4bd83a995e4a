//! HTTP gateway.
//!
//! Exposes the auth and blog services as a REST API. Handlers only see the
//! service traits held in [`AppState`], so the binary decides which concrete
//! repositories and notifiers stand behind them.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::future::Future;
use std::net::SocketAddr;

use tracing::info;

use common::{AppError, AppResult};

pub use crate::routes::create_router;
pub use crate::state::{AppState, HealthCheck};

/// Serve the API on `addr` until `shutdown` resolves.
pub async fn serve<F>(addr: SocketAddr, state: AppState, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
