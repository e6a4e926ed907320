#[macro_use]
mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Duration;
use serde_json::Value;

use common::{auth, get, seeded_source, token};
use school_payments::reporting::MemoryTransactionSource;
use school_payments::services::auth::AuthService;

#[actix_web::test]
async fn lists_transactions_with_paging_envelope() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(seeded_source().await, auth);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/payments/transactions?page=1&limit=2", &bearer).to_request(),
    )
    .await;

    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["custom_order_id"], "ref-c");
    assert_eq!(data[0]["gateway"], "PhonePe");
    assert_eq!(data[1]["order_amount"], serde_json::json!(50.0));
}

#[actix_web::test]
async fn applies_dashboard_filters() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(seeded_source().await, auth);

    let body: Value = test::call_and_read_body_json(
        &app,
        get(
            "/payments/transactions?status=success&school_id=&startDate=2025-06-01&endDate=2025-06-02",
            &bearer,
        )
        .to_request(),
    )
    .await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["custom_order_id"], "ref-a");
}

#[actix_web::test]
async fn scopes_report_to_school() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(seeded_source().await, auth);

    let body: Value = test::call_and_read_body_json(
        &app,
        get(
            "/payments/transactions/school/S1?sort=order_amount&order=asc",
            &bearer,
        )
        .to_request(),
    )
    .await;

    assert_eq!(body["total"], 2);
    let references: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["custom_order_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(references, vec!["ref-b", "ref-a"]);
}

#[actix_web::test]
async fn empty_store_returns_empty_page() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(Arc::new(MemoryTransactionSource::new()), auth);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/payments/transactions?page=2&limit=5", &bearer).to_request(),
    )
    .await;

    assert_eq!(
        body,
        serde_json::json!({ "data": [], "total": 0, "page": 2, "limit": 5 })
    );
}

#[actix_web::test]
async fn rejects_invalid_query() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(seeded_source().await, auth);

    for uri in [
        "/payments/transactions?page=0",
        "/payments/transactions?limit=abc",
        "/payments/transactions?sort=password",
        "/payments/transactions?order=up",
        "/payments/transactions?startDate=someday",
    ] {
        let response = test::call_service(&app, get(uri, &bearer).to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[actix_web::test]
async fn reports_transaction_status() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(seeded_source().await, auth);

    let body: Value = test::call_and_read_body_json(
        &app,
        get("/payments/transaction-status/ref-b", &bearer).to_request(),
    )
    .await;
    assert_eq!(body, serde_json::json!({ "status": "PENDING" }));

    let response = test::call_service(
        &app,
        get("/payments/transaction-status/nope", &bearer).to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn requires_valid_token() {
    let auth = auth();
    let foreign = token(&AuthService::new("someone-else", Duration::hours(1)));
    let app = app!(seeded_source().await, auth);

    let missing = test::call_service(
        &app,
        test::TestRequest::get().uri("/payments/transactions").to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let forged = test::call_service(&app, get("/payments/transactions", &foreign).to_request()).await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn mounts_health_and_payment_scopes() {
    let auth = auth();
    let bearer = token(&auth);
    let app = app!(seeded_source().await, auth);

    let health: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/health").to_request(),
    )
    .await;
    assert_eq!(health, serde_json::json!({ "status": "ok" }));

    let unscoped = test::call_service(&app, get("/transactions", &bearer).to_request()).await;
    assert_eq!(unscoped.status(), StatusCode::NOT_FOUND);
}
