//! Test that finalization needs a charge the provider reports as paid.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::TestApp;

const EMAIL: &str = "ana@example.com";

#[tokio::test]
async fn test_unconfirmed_intent_is_payment_required() {
    let app = TestApp::new();
    let token = app.token_for(EMAIL);
    let class = app.seed_class(3);
    let selection = app.select(EMAIL, class.id).await;

    let intent = app
        .post("/create-payment-intent", Some(&token), json!({"price": class.price}))
        .await;
    let intent_id = intent.body["paymentIntentId"].as_str().unwrap().to_string();

    let response = app
        .post(
            "/payments",
            Some(&token),
            TestApp::payment_body(EMAIL, &intent_id, selection, &class),
        )
        .await;
    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.error_code(), Some("payment_not_confirmed"));

    let state = app.db.dump();
    assert!(state.payments.is_empty());
    assert!(state.enrollments.is_empty());
    assert_eq!(state.selections.len(), 1);
    assert_eq!(state.classes.get(class.id).unwrap().seats, 3);
}

#[tokio::test]
async fn test_underpaid_intent_is_payment_required() {
    let app = TestApp::new();
    let token = app.token_for(EMAIL);
    let class = app.seed_class(3);
    let selection = app.select(EMAIL, class.id).await;
    let cheap = app.payments.paid_intent(EMAIL, 100);

    let response = app
        .post(
            "/payments",
            Some(&token),
            TestApp::payment_body(EMAIL, &cheap, selection, &class),
        )
        .await;
    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn test_unknown_intent_is_payment_required() {
    let app = TestApp::new();
    let token = app.token_for(EMAIL);
    let class = app.seed_class(3);
    let selection = app.select(EMAIL, class.id).await;

    let response = app
        .post(
            "/payments",
            Some(&token),
            TestApp::payment_body(EMAIL, "pi_never_created", selection, &class),
        )
        .await;
    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.error_code(), Some("payment_not_confirmed"));
    assert_eq!(app.db.dump().selections.len(), 1);
}

#[tokio::test]
async fn test_intent_of_another_buyer_is_payment_required() {
    let app = TestApp::new();
    let class = app.seed_class(3);
    let ana_intent = app.paid_intent(EMAIL);

    let eve = "eve@example.com";
    let eve_selection = app.select(eve, class.id).await;
    let stolen = app
        .post(
            "/payments",
            Some(&app.token_for(eve)),
            TestApp::payment_body(eve, &ana_intent, eve_selection, &class),
        )
        .await;
    assert_eq!(stolen.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(stolen.error_code(), Some("payment_not_confirmed"));
    assert!(app.db.dump().enrollments.is_empty());

    let selection = app.select(EMAIL, class.id).await;
    let paid = app
        .post(
            "/payments",
            Some(&app.token_for(EMAIL)),
            TestApp::payment_body(EMAIL, &ana_intent, selection, &class),
        )
        .await;
    assert_eq!(paid.status, StatusCode::OK);
}

#[tokio::test]
async fn test_reused_intent_conflicts() {
    let app = TestApp::new();
    let token = app.token_for(EMAIL);
    let first = app.seed_class(3);
    let second = app.seed_class(3);
    let intent = app.paid_intent(EMAIL);

    let selection = app.select(EMAIL, first.id).await;
    let paid = app
        .post(
            "/payments",
            Some(&token),
            TestApp::payment_body(EMAIL, &intent, selection, &first),
        )
        .await;
    assert_eq!(paid.status, StatusCode::OK);

    let selection = app.select(EMAIL, second.id).await;
    let reused = app
        .post(
            "/payments",
            Some(&token),
            TestApp::payment_body(EMAIL, &intent, selection, &second),
        )
        .await;
    assert_eq!(reused.status, StatusCode::CONFLICT);
    assert_eq!(reused.error_code(), Some("conflict"));
    assert_eq!(app.db.dump().enrollments.len(), 1);
}
