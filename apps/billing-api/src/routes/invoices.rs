//! Invoice handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use pizzeria_core::{CreateInvoiceRequest, Invoice};

use super::path_id;
use crate::error::ApiResult;
use crate::AppState;

const INVALID_ID: &str = "Invalid invoice ID";

/// `GET /api/invoices`
pub(crate) async fn list_invoices(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Invoice>>> {
    Ok(Json(state.invoices.list_invoices().await?))
}

/// `POST /api/invoices`
pub(crate) async fn create_invoice(
    State(state): State<AppState>,
    payload: Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let Json(request) = payload?;
    let invoice = state.invoices.create_invoice(request).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// `GET /api/invoices/{id}`
pub(crate) async fn get_invoice(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Invoice>> {
    let id = path_id(id, INVALID_ID)?;
    Ok(Json(state.invoices.get_invoice(id).await?))
}

/// `DELETE /api/invoices/{id}`
pub(crate) async fn delete_invoice(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = path_id(id, INVALID_ID)?;
    state.invoices.delete_invoice(id).await?;
    Ok(Json(json!({ "message": "Invoice deleted successfully" })))
}
