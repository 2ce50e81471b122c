//! Test that signing in twice creates one user.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::TestApp;
use crate::types::Role;

#[tokio::test]
async fn test_second_sign_in_conflicts() {
    let app = TestApp::new();
    let first = app
        .post("/users", None, json!({"email": "ana@example.com", "name": "Ana"}))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["acknowledged"], true);

    let second = app
        .post("/users", None, json!({"email": "ana@example.com", "name": "Ana B."}))
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code(), Some("conflict"));
    assert_eq!(second.body["message"], "user already exists");

    let users = app.db.dump().users;
    assert_eq!(users.len(), 1);
    let stored = users.iter().next().unwrap();
    assert_eq!(stored.name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_requested_role_is_ignored() {
    let app = TestApp::new();
    let response = app
        .post(
            "/users",
            None,
            json!({"email": "eve@example.com", "role": "admin", "photoURL": "https://x/y.png"}),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let user = app.db.dump().users.get(response.inserted_id()).cloned().unwrap();
    assert_eq!(user.role, Role::Member);
    assert_eq!(user.photo_url.as_deref(), Some("https://x/y.png"));
}

#[tokio::test]
async fn test_email_is_required() {
    let app = TestApp::new();
    let response = app.post("/users", None, json!({"name": "Nobody"})).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.db.dump().users.is_empty());
}
