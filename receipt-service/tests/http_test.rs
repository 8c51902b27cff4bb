//! HTTP surface tests for receipt-service.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{seeded_store, test_state};
use http_body_util::BodyExt;
use receipt_service::middleware::capability::{capabilities, CAPABILITIES_HEADER, USER_ID_HEADER};
use receipt_service::startup::router;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn authorized_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(USER_ID_HEADER, "cashier-1")
        .header(CAPABILITIES_HEADER, capabilities::PAYMENT_READ)
        .body(Body::empty())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn print_returns_inline_pdf() {
    let app = router(test_state(seeded_store(), true));

    let response = app
        .oneshot(authorized_get("/receipts/print?receipt_number=R-0001"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "inline; filename=\"receipt_R-0001.pdf\""
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn print_without_receipt_number_is_bad_request() {
    let store = seeded_store();
    let app = router(test_state(store.clone(), true));

    let response = app.oneshot(authorized_get("/receipts/print")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("RECEIPT NUMBER IS REQUIRED"));
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn print_with_malformed_query_renders_error_page() {
    let store = seeded_store();
    let app = router(test_state(store.clone(), true));

    let response = app
        .oneshot(authorized_get(
            "/receipts/print?receipt_number=R-0001&receipt_number=R-0002",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(body_text(response).await.contains("INVALID RECEIPT NUMBER"));
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn preview_with_malformed_query_is_json_bad_request() {
    let app = router(test_state(seeded_store(), false));

    let response = app
        .oneshot(get("/receipts/preview?receipt_number=A&receipt_number=B"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], "INVALID RECEIPT NUMBER");
}

#[tokio::test]
async fn print_without_capability_is_forbidden_before_storage() {
    let store = seeded_store();
    let app = router(test_state(store.clone(), true));

    let response = app
        .oneshot(get("/receipts/print?receipt_number=R-0001"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn print_unknown_receipt_renders_error_page() {
    let app = router(test_state(seeded_store(), true));

    let response = app
        .oneshot(authorized_get("/receipts/print?receipt_number=R-9999"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = body_text(response).await;
    assert!(body.contains("RECEIPT NOT FOUND"));
    assert!(!body.starts_with("%PDF"));
}

#[tokio::test]
async fn print_during_outage_reports_database_failure() {
    let store = seeded_store();
    store.set_offline(true);
    let app = router(test_state(store, true));

    let response = app
        .oneshot(authorized_get("/receipts/print?receipt_number=R-0001"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert!(body.contains("DATABASE CONNECTION FAILED"));
    assert!(!body.contains("os error"));
}

#[tokio::test]
async fn preview_returns_document_json() {
    let app = router(test_state(seeded_store(), false));

    let response = app
        .oneshot(get("/receipts/preview?receipt_number=R-0001"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["receipt_number"], "R-0001");
    assert_eq!(json["payor"], "JUAN DELA CRUZ");
    assert_eq!(json["amount_in_words"], "ONE THOUSAND FIVE HUNDRED PESOS ONLY");
    assert_eq!(json["lines"].as_array().unwrap().len(), 2);
    assert_eq!(json["payment_category"], "electronic");
}

#[tokio::test]
async fn preview_errors_are_json() {
    let app = router(test_state(seeded_store(), false));

    let response = app
        .oneshot(get("/receipts/preview?receipt_number=R-0002"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["error"], "NO VIOLATIONS FOUND");
}

#[tokio::test]
async fn health_reflects_storage() {
    let store = seeded_store();
    let app = router(test_state(store.clone(), true));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    store.set_offline(true);
    let response = app.oneshot(get("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = router(test_state(seeded_store(), true));

    let response = app.oneshot(get("/health")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
