mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp};

const ADMIN: &str = "admin@example.com";

async fn admin_app() -> TestApp {
    let app = TestApp::new().await;
    app.stub_identity(ADMIN, true).await;
    app
}

#[tokio::test]
async fn payment_crud_and_store_listing() {
    let app = admin_app().await;

    // Create with explicit status.
    let response = app
        .request(
            Method::POST,
            "/private/payment",
            Some(json!({
                "total": "49.90",
                "pix": "PIX-KEY-1",
                "status": "pending",
                "store_id": 3,
                "product_id": 7
            })),
            Some(ADMIN),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    let id = body["data"]["id"].as_i64().expect("payment id");

    // Create without status: defaults to `created`.
    let response = app
        .request(
            Method::POST,
            "/private/payment",
            Some(json!({
                "total": "10",
                "store_id": 3,
                "product_id": 8
            })),
            Some(ADMIN),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Update the first payment's status.
    let response = app
        .request(
            Method::PUT,
            &format!("/private/payment/{id}"),
            Some(json!({ "status": "paid" })),
            Some(ADMIN),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "paid");

    // Store listing returns both.
    let response = app
        .request(Method::GET, "/private/payment/store/3", None, Some(ADMIN))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn payment_search_filters_by_status() {
    let app = admin_app().await;

    for (status, product_id) in [("paid", 1), ("created", 2)] {
        let response = app
            .request(
                Method::POST,
                "/private/payment",
                Some(json!({
                    "total": "5",
                    "status": status,
                    "store_id": 1,
                    "product_id": product_id
                })),
                Some(ADMIN),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .request(
            Method::GET,
            "/private/payment/search?status=paid",
            None,
            Some(ADMIN),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let results = body["data"].as_array().expect("array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["status"], "paid");
}

#[tokio::test]
async fn payment_endpoints_reject_non_admin_and_missing_identity() {
    let app = TestApp::new().await;
    app.stub_identity("user@example.com", false).await;

    let create = json!({ "total": "5", "store_id": 1, "product_id": 1 });

    let response = app
        .request(
            Method::POST,
            "/private/payment",
            Some(create.clone()),
            Some("user@example.com"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::POST, "/private/payment", Some(create), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/private/payment/store/1", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn payment_update_of_unknown_id_is_not_found() {
    let app = admin_app().await;

    let response = app
        .request(
            Method::PUT,
            "/private/payment/999",
            Some(json!({ "status": "paid" })),
            Some(ADMIN),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_search_rejects_malformed_date() {
    let app = admin_app().await;

    let response = app
        .request(
            Method::GET,
            "/private/payment/search?endDate=tomorrow",
            None,
            Some(ADMIN),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
