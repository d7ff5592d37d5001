//! Ingestion, search, filter option and bulk delete handlers

use crate::server::commands::{
    AddInventoryForm, InventoryError, InventoryResult, SearchRequest, SelectionRequest,
};
use crate::server::service::{json_body, redirect_with_flash, AppState, Flash};
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::{Form, Json};
use infra_inventory_storage::{FilterOptions, InventoryRecord};
use serde::Serialize;
use tracing::{debug, error, warn};

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    results: Vec<InventoryRecord>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeleteResponse {
    success: bool,
    message: String,
}

/// Main page
pub(super) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Ingest one form submission and redirect back with a flash message
pub(super) async fn add_inventory(
    State(state): State<AppState>,
    form: Result<Form<AddInventoryForm>, FormRejection>,
) -> Redirect {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected inventory form");
            return redirect_with_flash(
                Flash::Error,
                &format!("Error adding data: {}", rejection.body_text()),
            );
        }
    };

    match state.inventory.add_inventory(form).await {
        Ok(_) => redirect_with_flash(Flash::Success, "Data added successfully!"),
        Err(InventoryError::Validation(message)) => redirect_with_flash(Flash::Error, &message),
        Err(e) => {
            error!(error = %e, "Failed to add inventory");
            redirect_with_flash(Flash::Error, &format!("Error adding data: {}", e))
        }
    }
}

pub(super) async fn get_filter_options(
    State(state): State<AppState>,
) -> InventoryResult<Json<FilterOptions>> {
    Ok(Json(state.inventory.filter_options().await?))
}

pub(super) async fn search_inventory(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> InventoryResult<Json<SearchResponse>> {
    let request = json_body(payload)?;
    let results = state.inventory.search(request).await?;

    debug!(results = results.len(), "Search completed");
    Ok(Json(SearchResponse { results }))
}

pub(super) async fn delete_selected(
    State(state): State<AppState>,
    payload: Result<Json<SelectionRequest>, JsonRejection>,
) -> InventoryResult<Json<DeleteResponse>> {
    let request = json_body(payload)?;
    let deleted = state.inventory.delete_selected(&request.ids).await?;

    Ok(Json(DeleteResponse {
        success: true,
        message: format!("Deleted {} items", deleted),
    }))
}
