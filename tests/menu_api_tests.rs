// SPDX-License-Identifier: MIT

//! Menu endpoint tests.
//!
//! The filter itself is unit-tested next to its implementation; these tests
//! cover the HTTP surface: allow-list parsing, anonymous sessions, and the
//! degraded principal-without-profile path.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn menu_destinations(response: axum::response::Response) -> Vec<String> {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    json["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["destination"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_anonymous_menu_is_public_entries_only() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/menu?allow=Profile,UserDashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let destinations = menu_destinations(response).await;
    assert_eq!(
        destinations,
        vec!["Home", "Login", "SignUp", "Gallery", "Ranking"]
    );
}

#[tokio::test]
async fn test_unknown_allow_list_names_are_ignored() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/menu?allow=Bogus,AlsoBogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let destinations = menu_destinations(response).await;
    // Anonymous visibility does not depend on the allow-list at all.
    assert_eq!(
        destinations,
        vec!["Home", "Login", "SignUp", "Gallery", "Ranking"]
    );
}

#[tokio::test]
async fn test_degraded_principal_follows_allow_list_only() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("u1", &state.config.jwt_signing_key);

    // The offline mock database fails the profile fetch, so this is the
    // principal-without-role degradation path.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/menu?allow=Home,Gallery,UploadPhoto,UserDashboard")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let destinations = menu_destinations(response).await;
    // No role: login/signup hidden, role-gated entries hidden, the rest
    // follow the allow-list.
    assert_eq!(destinations, vec!["Home", "Gallery"]);
}
