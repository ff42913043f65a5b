//! Integration tests for subscription HTTP endpoints.
//!
//! These tests drive the full application router over the in-memory store:
//! 1. The create/read/update/delete lifecycle
//! 2. Paging and spend summaries
//! 3. Status codes and error bodies for rejected requests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use subscriptions_api::adapters::memory::InMemorySubscriptionRepository;
use subscriptions_api::config::ServerConfig;
use subscriptions_api::domain::foundation::SubscriptionId;
use subscriptions_api::server::build_router;

const ALICE: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
const BOB: &str = "0b9c5d3e-8f43-4c2b-9a61-2f8f9c1d7e55";

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app() -> Router {
    build_router(
        Arc::new(InMemorySubscriptionRepository::new()),
        &ServerConfig::default(),
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn create(app: &Router, body: Value) -> String {
    let (status, body) = send(app, Method::POST, "/subscriptions", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

/// Seeds Alice with two subscriptions and Bob with one, oldest first.
async fn seed(app: &Router) -> (String, String, String) {
    let yandex = create(
        app,
        json!({"user_id": ALICE, "service": "Yandex Plus", "price": 400, "start_date": "07-2025"}),
    )
    .await;
    let netflix = create(
        app,
        json!({
            "user_id": ALICE,
            "service": "Netflix",
            "price": 600,
            "start_date": "08-2025",
            "end_date": "10-2025"
        }),
    )
    .await;
    let bobs = create(
        app,
        json!({"user_id": BOB, "service": "Yandex Plus", "price": 300, "start_date": "01-2024"}),
    )
    .await;
    (yandex, netflix, bobs)
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn created_subscription_reads_back_with_materialized_period() {
    let app = app();
    let (yandex, netflix, _) = seed(&app).await;

    let (status, body) = send(&app, Method::GET, &format!("/subscriptions/{}", yandex), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], yandex);
    assert_eq!(body["user_id"], ALICE);
    assert_eq!(body["service"], "Yandex Plus");
    assert_eq!(body["price"], 400);
    assert_eq!(body["start_date"], "2025-07-01");
    assert_eq!(body["end_date"], "2025-07-31");

    let (_, body) = send(&app, Method::GET, &format!("/subscriptions/{}", netflix), None).await;
    assert_eq!(body["start_date"], "2025-08-01");
    assert_eq!(body["end_date"], "2025-10-31");
}

#[tokio::test]
async fn duplicate_user_and_service_is_409() {
    let app = app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({"user_id": ALICE, "service": "Yandex Plus", "price": 1, "start_date": "01-2026"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SUBSCRIPTION_EXISTS");
}

#[tokio::test]
async fn update_replaces_terms_and_keeps_owner() {
    let app = app();
    let (yandex, _, _) = seed(&app).await;
    let uri = format!("/subscriptions/{}", yandex);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"service": "Yandex Plus", "price": 500, "start_date": "09-2025"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "subscription updated successfully");

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["user_id"], ALICE);
    assert_eq!(body["price"], 500);
    assert_eq!(body["start_date"], "2025-09-01");
    assert_eq!(body["end_date"], "2025-09-30");
}

#[tokio::test]
async fn update_onto_taken_service_is_409() {
    let app = app();
    let (_, netflix, _) = seed(&app).await;

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/subscriptions/{}", netflix),
        Some(json!({"service": "Yandex Plus", "price": 600, "start_date": "08-2025"})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_unknown_is_404() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/subscriptions/{}", SubscriptionId::new()),
        Some(json!({"service": "Netflix", "price": 600, "start_date": "08-2025"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SUBSCRIPTION_NOT_FOUND");
}

#[tokio::test]
async fn delete_removes_and_second_delete_is_404() {
    let app = app();
    let (yandex, _, _) = seed(&app).await;
    let uri = format!("/subscriptions/{}", yandex);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "subscription deleted successfully");

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn padded_service_name_is_stored_verbatim() {
    let app = app();
    let id = create(
        &app,
        json!({"user_id": ALICE, "service": "  Netflix  ", "price": 600, "start_date": "07-2025"}),
    )
    .await;

    let (_, body) = send(&app, Method::GET, &format!("/subscriptions/{}", id), None).await;
    assert_eq!(body["service"], "  Netflix  ");

    let (_, body) = send(
        &app,
        Method::GET,
        "/subscriptions/summary?start_date=2025-07-01&end_date=2025-07-31&service=Netflix",
        None,
    )
    .await;
    assert_eq!(body["total"], 0);
}

// =============================================================================
// Listing and summaries
// =============================================================================

#[tokio::test]
async fn list_pages_newest_first() {
    let app = app();
    let (yandex, _, bobs) = seed(&app).await;

    let (status, body) = send(&app, Method::GET, "/subscriptions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["subscriptions"][0]["id"], bobs);
    assert_eq!(body["subscriptions"][2]["id"], yandex);

    let (_, body) = send(&app, Method::GET, "/subscriptions?limit=2", None).await;
    assert_eq!(body["count"], 2);

    let (_, body) = send(&app, Method::GET, "/subscriptions?limit=2&offset=2", None).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["subscriptions"][0]["id"], yandex);
}

#[tokio::test]
async fn summary_filters_by_window_user_and_service() {
    let app = app();
    seed(&app).await;

    let window = "start_date=2025-01-01&end_date=2025-12-31";

    let (status, body) = send(&app, Method::GET, &format!("/subscriptions/summary?{}", window), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1000);

    let (_, body) = send(
        &app,
        Method::GET,
        "/subscriptions/summary?start_date=2024-01-01&end_date=2025-12-31",
        None,
    )
    .await;
    assert_eq!(body["total"], 1300);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/subscriptions/summary?{}&user_id={}", window, BOB),
        None,
    )
    .await;
    assert_eq!(body["total"], 0);

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/subscriptions/summary?{}&service=Yandex%20Plus", window),
        None,
    )
    .await;
    assert_eq!(body["total"], 400);
}

#[tokio::test]
async fn summary_includes_both_window_bounds() {
    let app = app();
    seed(&app).await;

    let (_, body) = send(
        &app,
        Method::GET,
        "/subscriptions/summary?start_date=2025-07-01&end_date=2025-08-01",
        None,
    )
    .await;
    assert_eq!(body["total"], 1000);
}

// =============================================================================
// Rejected requests
// =============================================================================

#[tokio::test]
async fn create_collects_field_errors() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({"user_id": "not-a-uuid", "service": "  ", "price": 0, "start_date": "07-2025"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["fields"]["user_id"].is_string());
    assert!(body["fields"]["service"].is_string());
    assert!(body["fields"]["price"].is_string());
}

#[tokio::test]
async fn create_with_bad_end_period_is_400() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/subscriptions",
        Some(json!({
            "user_id": ALICE,
            "service": "Netflix",
            "price": 600,
            "start_date": "08-2025",
            "end_date": "13-2025"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PERIOD_FORMAT");
}

#[tokio::test]
async fn summary_with_inverted_window_is_400() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/subscriptions/summary?start_date=2025-12-31&end_date=2025-01-01",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["end_date"].is_string());
}

#[tokio::test]
async fn summary_without_window_is_400() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/subscriptions/summary", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["start_date"].is_string());
    assert!(body["fields"]["end_date"].is_string());
}

#[tokio::test]
async fn create_with_padded_periods_is_400() {
    let app = app();

    for (start, end) in [(" 07-2025 ", "08-2025"), ("07-2025", "08-2025 ")] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/subscriptions",
            Some(json!({
                "user_id": ALICE,
                "service": "Netflix",
                "price": 600,
                "start_date": start,
                "end_date": end
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PERIOD_FORMAT");
    }

    let (_, body) = send(&app, Method::GET, "/subscriptions", None).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn summary_with_unpadded_date_is_400() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::GET,
        "/subscriptions/summary?start_date=2025-1-1&end_date=2025-12-31",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["fields"]["start_date"].is_string());
}
