// SPDX-License-Identifier: MIT

//! Request validation tests.
//!
//! Validation runs before any provider call, so these tests work with the
//! offline mock state.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::create_test_app;

async fn post_json(path: &str, body: serde_json::Value) -> (StatusCode, String) {
    let (app, _state) = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_signup_rejects_empty_name() {
    let (status, body) = post_json(
        "/auth/signup",
        json!({"name": "", "email": "ana@example.com", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Name is required"));
}

#[tokio::test]
async fn test_signup_rejects_invalid_email() {
    let (status, body) = post_json(
        "/auth/signup",
        json!({"name": "Ana", "email": "not-an-email", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid email address"));
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (status, body) = post_json(
        "/auth/signup",
        json!({"name": "Ana", "email": "ana@example.com", "password": "abc"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("at least 6 characters"));
}

#[tokio::test]
async fn test_signup_rejects_missing_fields() {
    let (status, _body) = post_json("/auth/signup", json!({"email": "ana@example.com"})).await;
    // Deserialization failure, not our validator.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_rejects_invalid_email() {
    let (status, body) = post_json(
        "/auth/login",
        json!({"email": "nope", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid email address"));
}

#[tokio::test]
async fn test_login_rejects_empty_password() {
    let (status, body) = post_json(
        "/auth/login",
        json!({"email": "ana@example.com", "password": ""}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Password is required"));
}

#[tokio::test]
async fn test_validation_error_body_shape() {
    let (status, body) = post_json(
        "/auth/signup",
        json!({"name": "", "email": "ana@example.com", "password": "secret123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["error"], "validation_error");
    assert!(parsed["details"].is_string());
}
