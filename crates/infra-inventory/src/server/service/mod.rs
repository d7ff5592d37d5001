//! HTTP service layer for the inventory server
//!
//! Routes requests to the handler modules, which delegate to
//! [`InventoryService`] and the [`ExportStore`].

mod export;
mod health;
mod inventory;

use crate::server::commands::{InventoryError, InventoryService};
use crate::server::export::ExportStore;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use infra_inventory_storage::Storage;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Validation and storage access
    pub(crate) inventory: Arc<InventoryService>,
    /// Selected exports awaiting download
    pub(crate) exports: Arc<ExportStore>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, export_ttl: Duration) -> Self {
        Self {
            inventory: Arc::new(InventoryService::new(storage)),
            exports: Arc::new(ExportStore::new(export_ttl)),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(inventory::index))
        .route("/add_inventory", post(inventory::add_inventory))
        .route("/get_filter_options", get(inventory::get_filter_options))
        .route("/search_inventory", post(inventory::search_inventory))
        .route("/delete_selected", post(inventory::delete_selected))
        .route("/export_all", get(export::export_all))
        .route("/export_selected", post(export::export_selected))
        .route("/download_temp/:token", get(export::download_temp))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .with_state(state)
}

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = match &self {
            InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
            InventoryError::Storage(_) | InventoryError::Export(_) => {
                error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Unwrap a JSON body, reporting malformed input as a validation error
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, InventoryError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| InventoryError::Validation(rejection.body_text()))
}

/// Flash message category shown on the main page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flash {
    Success,
    Error,
}

impl Flash {
    fn as_str(self) -> &'static str {
        match self {
            Flash::Success => "success",
            Flash::Error => "error",
        }
    }
}

/// Redirect to the main page carrying a message in the query string
pub(crate) fn redirect_with_flash(category: Flash, message: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("category", category.as_str())
        .append_pair("message", message)
        .finish();

    Redirect::to(&format!("/?{}", query))
}
