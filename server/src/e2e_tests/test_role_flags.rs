//! Test role flags, promotion and the admin-only user list.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::TestApp;

#[tokio::test]
async fn test_new_user_flags_then_promote() {
    let app = TestApp::new();
    let id = app.sign_up("ana@example.com").await;
    let token = app.token_for("ana@example.com");

    let admin = app.get("/users/admin/ana@example.com", Some(&token)).await;
    assert_eq!(admin.body, json!({"admin": false}));
    let instructor = app.get("/users/instructor/ana@example.com", Some(&token)).await;
    assert_eq!(instructor.body, json!({"instructor": false}));

    let promoted = app.patch(&format!("/users/admin/{id}"), None, None).await;
    assert_eq!(promoted.status, StatusCode::OK);
    assert_eq!(promoted.body["matchedCount"], 1);
    assert_eq!(promoted.body["modifiedCount"], 1);

    let admin = app.get("/users/admin/ana@example.com", Some(&token)).await;
    assert_eq!(admin.body, json!({"admin": true}));
    let instructor = app.get("/users/instructor/ana@example.com", Some(&token)).await;
    assert_eq!(instructor.body, json!({"instructor": false}));
}

#[tokio::test]
async fn test_flag_for_another_user_is_forbidden() {
    let app = TestApp::new();
    app.sign_up_as("boss@example.com", "admin").await;
    let token = app.token_for("eve@example.com");

    let response = app.get("/users/admin/boss@example.com", Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), Some("forbidden"));
    assert_eq!(response.body["message"], "forbidden Access");
}

#[tokio::test]
async fn test_promote_errors() {
    let app = TestApp::new();
    let missing = app
        .patch("/users/instructor/0123456789abcdef01234567", None, None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let malformed = app.patch("/users/instructor/not-an-id", None, None).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_list_is_admin_only() {
    let app = TestApp::new();
    let admin = app.sign_up_as("boss@example.com", "admin").await;
    app.sign_up("ana@example.com").await;

    let member = app.token_for("ana@example.com");
    let response = app.get("/users", Some(&member)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.get("/users", Some(&admin)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_instructor_listing_is_public() {
    let app = TestApp::new();
    app.sign_up_as("leo@example.com", "instructor").await;
    app.sign_up("ana@example.com").await;

    let response = app.get("/instructors", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let instructors = response.body.as_array().unwrap();
    assert_eq!(instructors.len(), 1);
    assert_eq!(instructors[0]["email"], "leo@example.com");
    assert_eq!(instructors[0]["role"], "instructor");
}
