//! CSV export handlers

use crate::server::commands::{InventoryResult, SelectionRequest};
use crate::server::export::{
    attachment_name, download_url, write_csv, EXPORT_ALL_PREFIX, EXPORT_SELECTED_PREFIX,
};
use crate::server::service::{json_body, redirect_with_flash, AppState, Flash};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::Serialize;
use tracing::{debug, error, info};

#[derive(Debug, Serialize)]
pub(super) struct ExportResponse {
    download_url: String,
}

/// Stream bytes as a timestamped CSV attachment
fn csv_attachment(prefix: &str, data: Vec<u8>) -> Response {
    let filename = attachment_name(prefix, Local::now());

    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        data,
    )
        .into_response()
}

async fn render_all(state: &AppState) -> InventoryResult<Vec<u8>> {
    let records = state.inventory.list_all().await?;
    let data = write_csv(&records)?;
    info!(rows = records.len(), "Exported all inventory");
    Ok(data)
}

/// Download every row; failures redirect to the main page
pub(super) async fn export_all(State(state): State<AppState>) -> Response {
    match render_all(&state).await {
        Ok(data) => csv_attachment(EXPORT_ALL_PREFIX, data),
        Err(e) => {
            error!(error = %e, "Failed to export inventory");
            redirect_with_flash(Flash::Error, &format!("Error exporting data: {}", e))
                .into_response()
        }
    }
}

/// Render the selected rows and hand back a single-use download URL
pub(super) async fn export_selected(
    State(state): State<AppState>,
    payload: Result<Json<SelectionRequest>, JsonRejection>,
) -> InventoryResult<Json<ExportResponse>> {
    let request = json_body(payload)?;
    let records = state.inventory.selected_records(&request.ids).await?;
    let data = write_csv(&records)?;

    let token = state.exports.insert(data).await;
    info!(rows = records.len(), token = %token, "Selected export ready");

    Ok(Json(ExportResponse {
        download_url: download_url(&token),
    }))
}

pub(super) async fn download_temp(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Response {
    match state.exports.take(&token).await {
        Some(data) => csv_attachment(EXPORT_SELECTED_PREFIX, data),
        None => {
            debug!(token = %token, "Export not found");
            (StatusCode::NOT_FOUND, "File not found").into_response()
        }
    }
}
