//! Liveness and readiness probes
//!
//! `/healthz` answers as long as the process serves requests; `/readyz`
//! also requires a working database with the inventory schema in place.

use crate::server::service::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, warn};

/// Liveness probe endpoint
pub(super) async fn healthz() -> StatusCode {
    debug!("Liveness probe: OK");
    StatusCode::OK
}

/// Readiness probe endpoint
///
/// Returns 503 Service Unavailable if the storage health check fails.
pub(super) async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.inventory.health_check().await {
        Ok(()) => {
            debug!("Readiness probe: OK");
            StatusCode::OK
        }
        Err(e) => {
            warn!(error = %e, "Readiness probe: NOT READY (storage unavailable)");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
