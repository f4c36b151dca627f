//! REST API over the rule catalog and the sizing engine.
//!
//! Provides two endpoints:
//! - `GET /catalog`: appliance wattages, locations, and backup options
//! - `POST /sizing`: load profile JSON in, sizing report JSON out

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::catalog::RuleCatalog;

pub use types::{CatalogResponse, ErrorResponse};

/// Immutable application state shared across all request handlers.
///
/// The catalog is validated before the server starts and never changes
/// afterwards, so handlers read it without locking.
pub struct AppState {
    pub catalog: RuleCatalog,
}

impl AppState {
    pub fn new(catalog: RuleCatalog) -> Self {
        Self { catalog }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state holding the validated catalog
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/catalog", get(handlers::get_catalog))
        .route("/sizing", post(handlers::post_sizing))
        .with_state(state)
}

/// Binds to `addr` and serves the API until the process exits.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
