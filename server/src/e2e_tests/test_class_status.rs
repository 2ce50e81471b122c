//! Test class creation and the pending -> approved/denied workflow.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::e2e_tests::helpers::TestApp;
use crate::types::{ClassStatus, ObjectId};

const INSTRUCTOR: &str = "leo@example.com";

fn draft(name: &str) -> Value {
    json!({
        "className": name,
        "classImage": "https://img.example.com/class.png",
        "instructorName": "Leo",
        "instructorEmail": INSTRUCTOR,
        "price": 30,
        "seats": 12,
    })
}

async fn create_class(app: &TestApp, token: &str, name: &str) -> ObjectId {
    let response = app.post("/classes", Some(token), draft(name)).await;
    assert_eq!(response.status, StatusCode::OK, "create {name}");
    response.inserted_id()
}

#[tokio::test]
async fn test_instructor_creates_pending_class() {
    let app = TestApp::new();
    let token = app.sign_up_as(INSTRUCTOR, "instructor").await;
    let id = create_class(&app, &token, "Hip Hop").await;

    let class = app.get(&format!("/updatedClass/{id}"), None).await;
    assert_eq!(class.body["status"], "pending");
    assert_eq!(class.body["totalStudent"], 0);

    let own = app.get(&format!("/email?email={INSTRUCTOR}"), Some(&token)).await;
    assert_eq!(own.body.as_array().unwrap().len(), 1);
    assert!(app.get("/approvedClasses", None).await.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_members_cannot_create_classes() {
    let app = TestApp::new();
    app.sign_up(INSTRUCTOR).await;
    let token = app.token_for(INSTRUCTOR);

    let response = app.post("/classes", Some(&token), draft("Hip Hop")).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.db.dump().classes.is_empty());
}

#[tokio::test]
async fn test_approve_once() {
    let app = TestApp::new();
    let instructor = app.sign_up_as(INSTRUCTOR, "instructor").await;
    let admin = app.sign_up_as("boss@example.com", "admin").await;
    let id = create_class(&app, &instructor, "Hip Hop").await;

    let approved = app
        .patch(&format!("/classes?id={id}&status=approved"), Some(&admin), None)
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    assert_eq!(approved.body["modifiedCount"], 1);

    let again = app
        .patch(
            &format!("/classes?id={id}&status=denied&feedback=late"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.error_code(), Some("invalid_transition"));

    let class = app.db.dump().classes.get(id).cloned().unwrap();
    assert_eq!(class.status, ClassStatus::Approved);
    assert!(class.feedback.is_none());
    assert_eq!(app.get("/approvedClasses", None).await.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deny_needs_feedback_and_approve_refuses_it() {
    let app = TestApp::new();
    let instructor = app.sign_up_as(INSTRUCTOR, "instructor").await;
    let admin = app.sign_up_as("boss@example.com", "admin").await;
    let id = create_class(&app, &instructor, "Hip Hop").await;

    let bare_deny = app
        .patch(&format!("/classes?id={id}&status=denied"), Some(&admin), None)
        .await;
    assert_eq!(bare_deny.status, StatusCode::BAD_REQUEST);

    let chatty_approve = app
        .patch(
            &format!("/classes?id={id}&status=approved&feedback=great"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(chatty_approve.status, StatusCode::BAD_REQUEST);

    let denied = app
        .post(
            &format!("/classes/{id}/deny"),
            Some(&admin),
            json!({"feedback": "Please add a syllabus"}),
        )
        .await;
    assert_eq!(denied.status, StatusCode::OK);

    let class = app.db.dump().classes.get(id).cloned().unwrap();
    assert_eq!(class.status, ClassStatus::Denied);
    assert_eq!(class.feedback.as_deref(), Some("Please add a syllabus"));
}

#[tokio::test]
async fn test_status_change_is_admin_only() {
    let app = TestApp::new();
    let instructor = app.sign_up_as(INSTRUCTOR, "instructor").await;
    let id = create_class(&app, &instructor, "Hip Hop").await;

    let anonymous = app
        .patch(&format!("/classes?id={id}&status=approved"), None, None)
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let own = app
        .patch(&format!("/classes?id={id}&status=approved"), Some(&instructor), None)
        .await;
    assert_eq!(own.status, StatusCode::FORBIDDEN);
    assert_eq!(
        app.db.dump().classes.get(id).unwrap().status,
        ClassStatus::Pending
    );
}

#[tokio::test]
async fn test_unknown_class_status_change() {
    let app = TestApp::new();
    let admin = app.sign_up_as("boss@example.com", "admin").await;
    let response = app
        .patch(
            &format!("/classes?id={}&status=approved", ObjectId::generate()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
