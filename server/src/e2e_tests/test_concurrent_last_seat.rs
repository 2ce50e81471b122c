//! Test two buyers racing for the last seat.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::e2e_tests::helpers::{TestApp, TestResponse};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_seat_is_sold_once() {
    let app = Arc::new(TestApp::new());
    let class = app.seed_class(1);

    let mut purchases = Vec::new();
    for email in ["ana@example.com", "leo@example.com"] {
        let selection = app.select(email, class.id).await;
        let body = TestApp::payment_body(email, &app.paid_intent(email), selection, &class);
        let token = app.token_for(email);
        let app = Arc::clone(&app);
        purchases.push(tokio::spawn(async move {
            app.post("/payments", Some(&token), body).await
        }));
    }

    let mut responses: Vec<TestResponse> = Vec::new();
    for purchase in purchases {
        responses.push(purchase.await.unwrap());
    }

    let succeeded = responses
        .iter()
        .filter(|r| r.status == StatusCode::OK)
        .count();
    let rejected: Vec<_> = responses
        .iter()
        .filter(|r| r.status != StatusCode::OK)
        .collect();
    assert_eq!(succeeded, 1);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].status, StatusCode::CONFLICT);
    assert_eq!(rejected[0].error_code(), Some("capacity_exceeded"));

    let state = app.db.dump();
    let stored = state.classes.get(class.id).unwrap();
    assert_eq!(stored.seats, 0);
    assert_eq!(stored.total_student, 1);
    assert_eq!(state.enrollments.len(), 1);
    assert_eq!(state.payments.len(), 1);
    assert_eq!(state.selections.len(), 1);
}
