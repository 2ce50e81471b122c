//! HTTP surface of the booking server.
//!
//! Handlers are thin: they extract the request, run the authorization gate
//! the route needs, and hand off to one domain module.

mod cart;
mod classes;
mod payments;
mod token;
mod users;

use std::sync::Arc;

use axum::Router;
use axum::extract::FromRef;
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::TokenConfig;
use crate::error::ApiError;
use crate::payment::PaymentProvider;
use crate::storage::Database;
use crate::types::ObjectId;

/// State shared by every handler.
#[derive(Clone)]
#[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected for shared state
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenConfig>,
    pub payments: Arc<dyn PaymentProvider>,
}

impl FromRef<AppState> for Arc<TokenConfig> {
    #[allow(clippy::disallowed_methods)]
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/jwt", post(token::issue))
        .route("/users", get(users::list).post(users::create))
        .route("/instructors", get(users::instructors))
        .route(
            "/users/admin/{target}",
            get(users::is_admin).patch(users::make_admin),
        )
        .route(
            "/users/instructor/{target}",
            get(users::is_instructor).patch(users::make_instructor),
        )
        .route(
            "/classes",
            get(classes::list)
                .post(classes::create)
                .patch(classes::set_status),
        )
        .route("/classes/{id}/deny", post(classes::deny))
        .route("/approvedClasses", get(classes::approved))
        .route("/popularClass", get(classes::popular))
        .route("/updatedClass/{id}", get(classes::detail))
        .route("/updateClass/{id}", patch(classes::update))
        .route("/totalStudent/{id}", patch(classes::count_student))
        .route("/email", get(classes::by_instructor))
        .route("/selected", get(cart::list))
        .route("/selected/{id}", delete(cart::remove))
        .route("/selectedClass", post(cart::add))
        .route("/history/{email}", get(payments::history))
        .route("/enrolled/{email}", get(payments::enrolled))
        .route("/create-payment-intent", post(payments::create_intent))
        .route("/payments", post(payments::finalize))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "dance class booking server is running")
}

/// Parse an id taken from the path or query string.
fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    Ok(ObjectId::parse_str(raw)?)
}
