//! Test the liveness route and token issuance.

use axum::http::StatusCode;
use serde_json::json;

use crate::auth::verify_token;
use crate::auth::TokenConfig;
use crate::e2e_tests::helpers::{SECRET, TestApp};

#[tokio::test]
async fn test_root_reports_liveness() {
    let app = TestApp::new();
    let response = app.get("/", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.as_str().is_some_and(|text| text.contains("running")));
}

#[tokio::test]
async fn test_jwt_signs_client_payload() {
    let app = TestApp::new();
    let response = app
        .post("/jwt", None, json!({"email": "ana@example.com", "name": "Ana"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let token = response.body["token"].as_str().unwrap();
    let config = TokenConfig::new_hs256(SECRET.to_vec()).unwrap();
    let identity = verify_token(token, &config).unwrap();
    assert_eq!(identity.email, "ana@example.com");
    assert_eq!(identity.claims["name"], "Ana");
}

#[tokio::test]
async fn test_jwt_needs_an_email() {
    let app = TestApp::new();
    let response = app.post("/jwt", None, json!({"name": "Nobody"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("bad_request"));

    let response = app.post("/jwt", None, json!(["not", "an", "object"])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_issued_token_opens_protected_routes() {
    let app = TestApp::new();
    app.sign_up("ana@example.com").await;
    let token = app
        .post("/jwt", None, json!({"email": "ana@example.com"}))
        .await
        .body["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.get("/users/admin/ana@example.com", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"admin": false}));
}
