//! Test the full purchase: intent, confirmation, finalization.

use axum::http::StatusCode;
use serde_json::json;

use crate::e2e_tests::helpers::TestApp;

const EMAIL: &str = "ana@example.com";

#[tokio::test]
async fn test_purchase_enrolls_student() {
    let app = TestApp::new();
    app.sign_up(EMAIL).await;
    let token = app.token_for(EMAIL);
    let class = app.seed_class(2);
    let selection = app.select(EMAIL, class.id).await;

    let intent = app
        .post("/create-payment-intent", Some(&token), json!({"price": class.price}))
        .await;
    assert_eq!(intent.status, StatusCode::OK);
    let intent_id = intent.body["paymentIntentId"].as_str().unwrap().to_string();
    assert!(intent.body["clientSecret"].as_str().is_some());
    assert_eq!(app.payments.intent(&intent_id).unwrap().amount, 2500);

    // The client confirms the card with the provider directly.
    app.payments.confirm(&intent_id);

    let response = app
        .post(
            "/payments",
            Some(&token),
            TestApp::payment_body(EMAIL, &intent_id, selection, &class),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["insertResult"]["acknowledged"], true);
    assert_eq!(response.body["deleteResult"]["deletedCount"], 1);
    assert_eq!(response.body["updateSeats"]["modifiedCount"], 1);
    assert!(response.body["enrolledResult"]["insertedId"].is_string());

    let stored = app.db.dump().classes.get(class.id).cloned().unwrap();
    assert_eq!(stored.seats, 1);
    assert_eq!(stored.total_student, 1);

    let cart = app.get(&format!("/selected?email={EMAIL}"), Some(&token)).await;
    assert_eq!(cart.body, json!([]));

    let enrolled = app.get(&format!("/enrolled/{EMAIL}"), None).await;
    let enrolled = enrolled.body.as_array().unwrap();
    assert_eq!(enrolled.len(), 1);
    assert_eq!(enrolled[0]["classId"], class.id.to_string());
    assert_eq!(enrolled[0]["instructorEmail"], class.instructor_email);

    let history = app.get(&format!("/history/{EMAIL}"), None).await;
    let history = history.body.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["transactionId"], intent_id);
    assert!(history[0]["date"].is_string());
}

#[tokio::test]
async fn test_price_in_body_is_optional() {
    let app = TestApp::new();
    let class = app.seed_class(2);
    let selection = app.select(EMAIL, class.id).await;
    let mut body = TestApp::payment_body(EMAIL, &app.paid_intent(EMAIL), selection, &class);
    body.as_object_mut().unwrap().remove("price");

    let response = app
        .post("/payments", Some(&app.token_for(EMAIL)), body)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let history = app.db.dump().payments;
    assert_eq!(history.len(), 1);
    assert!(history.iter().all(|p| (p.price - class.price).abs() < f64::EPSILON));
}

#[tokio::test]
async fn test_intent_requires_token_and_positive_price() {
    let app = TestApp::new();
    let anonymous = app
        .post("/create-payment-intent", None, json!({"price": 10}))
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let token = app.token_for(EMAIL);
    let free = app
        .post("/create-payment-intent", Some(&token), json!({"price": 0}))
        .await;
    assert_eq!(free.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_paying_for_someone_else_is_forbidden() {
    let app = TestApp::new();
    let class = app.seed_class(2);
    let selection = app.select(EMAIL, class.id).await;
    let intent = app.paid_intent(EMAIL);

    let eve = app.token_for("eve@example.com");
    let response = app
        .post(
            "/payments",
            Some(&eve),
            TestApp::payment_body(EMAIL, &intent, selection, &class),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.db.dump().payments.is_empty());
}
