//! Test that protected routes reject bad credentials before doing anything.

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::e2e_tests::helpers::{TestApp, expired_token_for, foreign_token_for};

const EMAIL: &str = "ana@example.com";

fn assert_unauthorized(response: &crate::e2e_tests::helpers::TestResponse) {
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.body,
        json!({"error": true, "code": "unauthorized", "message": "Unauthorized Access"})
    );
}

#[tokio::test]
async fn test_missing_token() {
    let app = TestApp::new();
    app.sign_up(EMAIL).await;
    assert_unauthorized(&app.get("/users/admin/ana@example.com", None).await);
    assert_unauthorized(&app.get("/users", None).await);
    assert_unauthorized(&app.get("/selected?email=ana@example.com", None).await);
}

#[tokio::test]
async fn test_expired_token() {
    let app = TestApp::new();
    app.sign_up(EMAIL).await;
    let token = expired_token_for(EMAIL);
    assert_unauthorized(&app.get("/users/admin/ana@example.com", Some(&token)).await);
}

#[tokio::test]
async fn test_token_signed_with_another_key() {
    let app = TestApp::new();
    app.sign_up(EMAIL).await;
    let token = foreign_token_for(EMAIL);
    assert_unauthorized(&app.get("/users/instructor/ana@example.com", Some(&token)).await);
}

#[tokio::test]
async fn test_garbage_token() {
    let app = TestApp::new();
    assert_unauthorized(&app.get("/email?email=ana@example.com", Some("not.a.jwt")).await);
}

#[tokio::test]
async fn test_wrong_scheme() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method(Method::GET)
        .uri("/users/admin/ana@example.com")
        .header("authorization", format!("Basic {}", app.token_for(EMAIL)))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_payment_leaves_no_trace() {
    let app = TestApp::new();
    let class = app.seed_class(3);
    let selection = app.select(EMAIL, class.id).await;
    let intent = app.paid_intent(EMAIL);

    let response = app
        .post(
            "/payments",
            Some(&expired_token_for(EMAIL)),
            TestApp::payment_body(EMAIL, &intent, selection, &class),
        )
        .await;
    assert_unauthorized(&response);

    let state = app.db.dump();
    assert!(state.payments.is_empty());
    assert_eq!(state.selections.len(), 1);
    assert_eq!(state.classes.get(class.id).unwrap().seats, 3);
}
