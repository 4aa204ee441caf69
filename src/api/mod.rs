//! HTTP surface
//!
//! Routes:
//! - `GET /` service info
//! - `GET /prices` cached snapshot
//! - `GET /update` run a refresh inline and return the new snapshot
//! - `GET /test-coingecko` upstream liveness check

mod handlers;

use crate::refresh::RefreshJob;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub job: RefreshJob,
}

impl AppState {
    pub fn new(job: RefreshJob) -> Self {
        Self { job }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/prices", get(handlers::prices))
        .route("/update", get(handlers::update))
        .route("/test-coingecko", get(handlers::test_upstream))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the router on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "HTTP server listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
