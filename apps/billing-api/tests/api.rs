//! End-to-end tests for the HTTP API against an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use billing_api::{router, AppState};
use pizzeria_core::PricingEngine;
use pizzeria_db::{Database, DbConfig};

// =============================================================================
// Helpers
// =============================================================================

async fn test_app() -> (Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::new(db.clone(), PricingEngine::default());
    let app = router(state, &["http://localhost:3000".to_string()]);
    (app, db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_item(app: &Router, name: &str, category: &str, price: Value) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/items",
        Some(json!({ "name": name, "category": category, "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

// =============================================================================
// Health & Routing
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn health_reports_closed_database() {
    let (app, db) = test_app().await;
    db.close().await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let (app, _) = test_app().await;

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/invoices")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(preflight).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );

    let foreign = Request::builder()
        .uri("/api/items")
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(foreign).await.unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn item_lifecycle() {
    let (app, _) = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let id = create_item(&app, "Margherita Pizza", "Pizza", json!(8.99)).await;

    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(items[0]["id"], id);
    assert_eq!(items[0]["price"], json!(8.99));
    assert_eq!(items[0]["availability"], true);
    assert!(items[0]["created_at"].is_string());
    assert!(items[0].get("status").is_none());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/items/{id}"),
        Some(json!({ "price": 9.49, "availability": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Margherita Pizza");
    assert_eq!(updated["price"], json!(9.49));
    assert_eq!(updated["availability"], false);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted successfully");

    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(items, json!([]));

    let (status, body) = send(&app, Method::DELETE, &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found");
}

#[tokio::test]
async fn create_item_validation() {
    let (app, _) = test_app().await;

    for (payload, message) in [
        (
            json!({ "name": "", "category": "Pizza", "price": 8.99 }),
            "Item name is required",
        ),
        (
            json!({ "name": "Calzone", "category": "  ", "price": 8.99 }),
            "Category is required",
        ),
        (
            json!({ "name": "Calzone", "category": "Pizza", "price": 0 }),
            "Price must be greater than 0",
        ),
        (
            json!({ "name": "Calzone", "category": "Pizza", "price": -1.5 }),
            "Price must be greater than 0",
        ),
        (
            json!({ "name": "Calzone", "category": "Pizza" }),
            "Price must be greater than 0",
        ),
    ] {
        let (status, body) = send(&app, Method::POST, "/api/items", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/items",
        Some(json!({ "name": "Calzone", "category": "Pizza", "price": "10000000000000.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn price_accepts_decimal_strings() {
    let (app, _) = test_app().await;

    let id = create_item(&app, "Onions", "Topping", json!("0.75")).await;

    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(items[0]["id"], id);
    assert_eq!(items[0]["price"], json!(0.75));
}

#[tokio::test]
async fn empty_update_leaves_item_unchanged() {
    let (app, _) = test_app().await;
    let id = create_item(&app, "Sprite", "Beverage", json!(2.5)).await;
    let (_, before) = send(&app, Method::GET, "/api/items", None).await;

    let (status, after) = send(&app, Method::PUT, &format!("/api/items/{id}"), Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after, before[0]);
}

#[tokio::test]
async fn update_rejects_bad_input() {
    let (app, _) = test_app().await;
    let id = create_item(&app, "Water", "Beverage", json!(1.5)).await;

    let (status, body) = send(&app, Method::PUT, "/api/items/abc", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid item ID");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/items/{id}"),
        Some(json!({ "price": -2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::PUT, "/api/items/999", Some(json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let malformed = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/items/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send_request(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request data"));
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn invoice_totals_round_half_up() {
    let (app, _) = test_app().await;
    let pizza = create_item(&app, "Margherita Pizza", "Pizza", json!(8.99)).await;
    let cheese = create_item(&app, "Extra Cheese", "Topping", json!(1.50)).await;

    let (status, invoice) = send(
        &app,
        Method::POST,
        "/api/invoices",
        Some(json!({ "items": [
            { "item_id": pizza, "quantity": 2 },
            { "item_id": cheese, "quantity": 1 }
        ]})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invoice["total"], json!(19.48));
    assert_eq!(invoice["tax"], json!(1.95));
    assert_eq!(invoice["grand_total"], json!(21.43));

    let lines = invoice["invoice_items"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["item_id"], pizza);
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(lines[0]["subtotal"], json!(17.98));
    assert_eq!(lines[0]["item"]["name"], "Margherita Pizza");
    assert_eq!(lines[1]["subtotal"], json!(1.5));
    assert_eq!(lines[1]["invoice_id"], invoice["id"]);

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/invoices/{}", invoice["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, invoice);
}

#[tokio::test]
async fn failed_invoices_persist_nothing() {
    let (app, db) = test_app().await;
    let pizza = create_item(&app, "Veggie Supreme", "Pizza", json!(11.99)).await;
    let water = create_item(&app, "Water", "Beverage", json!(1.50)).await;
    send(
        &app,
        Method::PUT,
        &format!("/api/items/{pizza}"),
        Some(json!({ "availability": false })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/invoices",
        Some(json!({ "items": [{ "item_id": water, "quantity": 1 }, { "item_id": 999, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not found with ID: 999");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/invoices",
        Some(json!({ "items": [{ "item_id": water, "quantity": 1 }, { "item_id": pizza, "quantity": 1 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Item is not available: Veggie Supreme");

    for empty in [json!({ "items": [] }), json!({})] {
        let (status, body) = send(&app, Method::POST, "/api/invoices", Some(empty)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invoice must have at least one item");
    }

    for payload in [
        json!({ "items": [{ "item_id": water, "quantity": 0 }] }),
        json!({ "items": [{ "item_id": water, "quantity": "two" }] }),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/invoices", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, invoices) = send(&app, Method::GET, "/api/invoices", None).await;
    assert_eq!(invoices, json!([]));
    assert_eq!(db.invoices().count().await.unwrap(), 0);
    assert_eq!(db.invoices().count_lines().await.unwrap(), 0);
}

#[tokio::test]
async fn subtotals_are_frozen_and_deleted_items_resolve() {
    let (app, _) = test_app().await;
    let pizza = create_item(&app, "Pepperoni Pizza", "Pizza", json!(10.99)).await;

    let (_, invoice) = send(
        &app,
        Method::POST,
        "/api/invoices",
        Some(json!({ "items": [{ "item_id": pizza, "quantity": 3 }] })),
    )
    .await;
    let uri = format!("/api/invoices/{}", invoice["id"]);

    send(
        &app,
        Method::PUT,
        &format!("/api/items/{pizza}"),
        Some(json!({ "price": 12.99 })),
    )
    .await;
    send(&app, Method::DELETE, &format!("/api/items/{pizza}"), None).await;

    let (status, reloaded) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let line = &reloaded["invoice_items"][0];
    assert_eq!(line["subtotal"], json!(32.97));
    assert_eq!(reloaded["total"], json!(32.97));
    assert_eq!(line["item"]["name"], "Pepperoni Pizza");
    assert_eq!(line["item"]["price"], json!(12.99));

    let (_, items) = send(&app, Method::GET, "/api/items", None).await;
    assert_eq!(items, json!([]));
}

#[tokio::test]
async fn invoices_list_newest_first() {
    let (app, _) = test_app().await;
    let coke = create_item(&app, "Coca Cola", "Beverage", json!(2.50)).await;

    let mut ids = Vec::new();
    for quantity in 1..=3 {
        let (_, invoice) = send(
            &app,
            Method::POST,
            "/api/invoices",
            Some(json!({ "items": [{ "item_id": coke, "quantity": quantity }] })),
        )
        .await;
        ids.push(invoice["id"].as_i64().unwrap());
    }
    ids.reverse();

    let (status, invoices) = send(&app, Method::GET, "/api/invoices", None).await;
    assert_eq!(status, StatusCode::OK);

    let listed: Vec<i64> = invoices
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, ids);
    assert_eq!(invoices[0]["invoice_items"][0]["quantity"], 3);
}

#[tokio::test]
async fn invoice_business_date_can_be_supplied() {
    let (app, _) = test_app().await;
    let water = create_item(&app, "Water", "Beverage", json!(1.50)).await;

    let (status, invoice) = send(
        &app,
        Method::POST,
        "/api/invoices",
        Some(json!({
            "items": [{ "item_id": water, "quantity": 2 }],
            "date": "2024-06-01T18:30:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(invoice["date"].as_str().unwrap().starts_with("2024-06-01T18:30:00"));
    assert_eq!(invoice["grand_total"], json!(3.3));
}

#[tokio::test]
async fn invoice_lookup_and_delete() {
    let (app, _) = test_app().await;
    let water = create_item(&app, "Water", "Beverage", json!(1.50)).await;

    let (status, body) = send(&app, Method::GET, "/api/invoices/xyz", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid invoice ID");

    let (status, _) = send(&app, Method::GET, "/api/invoices/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, invoice) = send(
        &app,
        Method::POST,
        "/api/invoices",
        Some(json!({ "items": [{ "item_id": water, "quantity": 1 }] })),
    )
    .await;
    let uri = format!("/api/invoices/{}", invoice["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Invoice deleted successfully");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, invoices) = send(&app, Method::GET, "/api/invoices", None).await;
    assert_eq!(invoices, json!([]));
}
