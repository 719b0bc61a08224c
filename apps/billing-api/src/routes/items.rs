//! Catalog item handlers.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use pizzeria_core::{Item, ItemUpdate, NewItem};

use super::path_id;
use crate::error::ApiResult;
use crate::AppState;

const INVALID_ID: &str = "Invalid item ID";

/// `GET /api/items`
pub(crate) async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.catalog.list_items().await?))
}

/// `POST /api/items`
pub(crate) async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let Json(new_item) = payload?;
    let item = state.catalog.create_item(new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/items/{id}`
pub(crate) async fn update_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> ApiResult<Json<Item>> {
    let id = path_id(id, INVALID_ID)?;
    let Json(update) = payload?;
    Ok(Json(state.catalog.update_item(id, update).await?))
}

/// `DELETE /api/items/{id}`
pub(crate) async fn delete_item(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = path_id(id, INVALID_ID)?;
    state.catalog.delete_item(id).await?;
    Ok(Json(json!({ "message": "Item deleted successfully" })))
}
