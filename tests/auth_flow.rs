mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

async fn register(app: &TestApp, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    app.call(
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn login(app: &TestApp, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    app.call(
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

#[tokio::test]
async fn registered_user_can_log_in_and_place_orders() {
    let app = TestApp::new();

    let (status, body) = register(&app, "New.User@Example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "new.user@example.com");
    assert!(body["data"].get("password_hash").is_none());

    let (status, body) = login(&app, "new.user@example.com", "password123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token_type"], "Bearer");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/orders",
            &token,
            json!({ "product_name": "First order", "amount": 12.5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "new");

    let (status, body) = app.get("/api/orders", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let app = TestApp::new();
    let (status, _) = register(&app, "dup@example.com", "password123").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = register(&app, "DUP@example.com", "another-password").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["data"]["fields"]["email"].is_array());
}

#[tokio::test]
async fn invalid_registration_reports_each_field() {
    let app = TestApp::new();

    let (status, body) = register(&app, "not-an-email", "short").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "The given data was invalid");
    assert!(body["data"]["fields"]["email"].is_array());
    assert!(body["data"]["fields"]["password"].is_array());
}

#[tokio::test]
async fn wrong_credentials_are_unauthenticated() {
    let app = TestApp::new();
    register(&app, "user@example.com", "password123").await;

    let (status, _) = login(&app, "user@example.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "nobody@example.com", "password123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_fields_is_a_validation_error() {
    let app = TestApp::new();

    let (status, _) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "user@example.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
