//! # HTTP Routes
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health               liveness                                  │
//! │                                                                         │
//! │  GET    /api/items            active catalog, ordered by id            │
//! │  POST   /api/items            create item                    → 201     │
//! │  PUT    /api/items/{id}       partial update                           │
//! │  DELETE /api/items/{id}       soft delete                              │
//! │                                                                         │
//! │  GET    /api/invoices         active invoices, newest first            │
//! │  POST   /api/invoices         price + persist               → 201      │
//! │  GET    /api/invoices/{id}    one invoice                              │
//! │  DELETE /api/invoices/{id}    soft delete with lines                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every response passes through the CORS layer and a `TraceLayer` whose
//! span carries a fresh request id.

mod health;
mod invoices;
mod items;

use axum::body::Body;
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Builds the application router with CORS and request tracing.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = Uuid::new_v4();
        tracing::info_span!(
            "http_request",
            %request_id,
            method = %request.method(),
            uri = %request.uri()
        )
    });

    Router::new()
        .route("/health", get(health::health))
        .route("/api/items", get(items::list_items).post(items::create_item))
        .route(
            "/api/items/{id}",
            put(items::update_item).delete(items::delete_item),
        )
        .route(
            "/api/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/api/invoices/{id}",
            get(invoices::get_invoice).delete(invoices::delete_invoice),
        )
        .fallback(not_found)
        .layer(trace)
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// CORS for the billing frontend. Credentials are allowed, so origins are
/// an explicit list.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Unwraps an integer path id, reporting `message` when it doesn't parse.
fn path_id(id: Result<Path<i64>, PathRejection>, message: &str) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::validation(message))
}
