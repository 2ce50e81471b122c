use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;

use super::AppState;
use crate::auth::AuthenticatedUser;
use crate::enrollment::{self, EnrollmentReceipt, PaymentIntentCreated};
use crate::error::ApiError;
use crate::types::{Enrollment, Payment, PaymentRequest};

#[derive(Deserialize)]
pub struct IntentBody {
    price: f64,
}

pub async fn create_intent(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    payload: Result<Json<IntentBody>, JsonRejection>,
) -> Result<Json<PaymentIntentCreated>, ApiError> {
    let Json(body) = payload?;
    let created =
        enrollment::create_payment_intent(state.payments.as_ref(), &caller, body.price).await?;
    Ok(Json(created))
}

pub async fn finalize(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<Json<EnrollmentReceipt>, ApiError> {
    let Json(request) = payload?;
    let receipt =
        enrollment::finalize(&state.db, state.payments.as_ref(), &caller, request).await?;
    Ok(Json(receipt))
}

pub async fn history(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(enrollment::payment_history(&state.db, &email)?))
}

pub async fn enrolled(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Vec<Enrollment>>, ApiError> {
    Ok(Json(enrollment::enrollments_for(&state.db, &email)?))
}
