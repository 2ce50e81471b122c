//! Payment and enrollment sequencing.
//!
//! A purchase goes through two steps:
//! 1. `create_payment_intent` asks the provider for a card charge intent
//!    the web client confirms directly with the provider.
//! 2. `finalize` checks with the provider that the intent was paid, then
//!    records the payment, empties the cart entry, enrolls the student and
//!    takes a seat, all in one store transaction.
//!
//! # Pre-conditions
//! - The caller is authenticated and pays for themselves, with an intent
//!   opened under their own email.
//!
//! # Post-conditions
//! - Either every write of a finalization is visible or none is.
//!
//! # Invariants
//! - Seats never go below zero; the last seat is sold at most once.
//! - A provider intent pays for at most one enrollment.

use chrono::Utc;
use serde::Serialize;

use crate::auth::{AuthenticatedUser, require_same_identity};
use crate::error::ApiError;
use crate::payment::{
    CURRENCY, ChargeIntent, PaymentError, PaymentProvider, is_valid_intent_id, to_minor_units,
};
use crate::storage::{Database, DeleteResult, InsertResult, Transaction, UpdateResult};
use crate::types::{Class, ClassStatus, Enrollment, ObjectId, Payment, PaymentRequest, Selection};

/// What the web client needs to confirm a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreated {
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// The four writes of a finalized payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentReceipt {
    pub insert_result: InsertResult,
    pub delete_result: DeleteResult,
    pub update_seats: UpdateResult,
    pub enrolled_result: InsertResult,
}

/// Open a card charge for `price` dollars, payable by `caller`.
pub async fn create_payment_intent(
    provider: &dyn PaymentProvider,
    caller: &AuthenticatedUser,
    price: f64,
) -> Result<PaymentIntentCreated, ApiError> {
    let amount = to_minor_units(price)
        .ok_or_else(|| ApiError::BadRequest("price must be a positive number".to_string()))?;
    let intent = provider
        .create_intent(amount, CURRENCY, caller.email())
        .await?;
    let client_secret = intent
        .client_secret
        .ok_or_else(|| PaymentError::Decode("intent has no client_secret".to_string()))?;
    Ok(PaymentIntentCreated {
        client_secret,
        payment_intent_id: intent.id,
    })
}

/// Turn a paid charge into an enrollment.
pub async fn finalize(
    db: &Database,
    provider: &dyn PaymentProvider,
    caller: &AuthenticatedUser,
    request: PaymentRequest,
) -> Result<EnrollmentReceipt, ApiError> {
    require_same_identity(caller, &request.email)?;
    if !is_valid_intent_id(&request.transaction_id) {
        return Err(ApiError::BadRequest("malformed transactionId".to_string()));
    }

    let intent = provider
        .retrieve_intent(&request.transaction_id)
        .await
        .map_err(unconfirmed_if_unknown)?;
    if intent.id != request.transaction_id {
        return Err(ApiError::PaymentNotConfirmed(format!(
            "provider returned intent {} for {}",
            intent.id, request.transaction_id
        )));
    }
    if intent.payer() != Some(request.email.as_str()) {
        return Err(ApiError::PaymentNotConfirmed(format!(
            "charge {} was not opened by {}",
            intent.id, request.email
        )));
    }

    let receipt = db.transaction(|txn| record_enrollment(txn, &request, &intent))?;
    tracing::info!(
        "{} enrolled in class {} (payment {})",
        request.email,
        request.enrolled_class,
        request.transaction_id
    );
    Ok(receipt)
}

/// An intent the provider has never heard of is an unconfirmed charge,
/// not a provider outage.
fn unconfirmed_if_unknown(error: PaymentError) -> ApiError {
    match error {
        PaymentError::Provider { status: 404, message } => ApiError::PaymentNotConfirmed(message),
        other => ApiError::PaymentProvider(other),
    }
}

/// The transactional half of `finalize`. Every check is made against the
/// state inside the transaction, so concurrent buyers cannot both pass.
fn record_enrollment(
    txn: &mut Transaction<'_>,
    request: &PaymentRequest,
    intent: &ChargeIntent,
) -> Result<EnrollmentReceipt, ApiError> {
    let class = txn
        .get::<Class>(request.enrolled_class)
        .ok_or_else(|| ApiError::NotFound("class".to_string()))?;
    if class.status != ClassStatus::Approved {
        return Err(ApiError::Conflict("class is not open for enrollment".to_string()));
    }
    if class.seats == 0 {
        return Err(ApiError::CapacityExceeded);
    }

    let due = to_minor_units(class.price).unwrap_or(0);
    if let Some(reason) = intent.shortfall(due) {
        return Err(ApiError::PaymentNotConfirmed(reason));
    }
    if txn
        .find_one::<Payment>(|p| p.transaction_id == request.transaction_id)
        .is_some()
    {
        return Err(ApiError::Conflict("payment already recorded".to_string()));
    }

    let insert_result = txn.insert(Payment {
        id: ObjectId::generate(),
        email: request.email.clone(),
        price: class.price,
        transaction_id: request.transaction_id.clone(),
        date: Utc::now(),
        selected_class: request.selected_class,
        enrolled_class: request.enrolled_class,
        class_name: request
            .class_name
            .clone()
            .or_else(|| Some(class.class_name.clone())),
    })?;

    let delete_result = txn.delete_one::<Selection>(request.selected_class, |s| {
        s.email == request.email && s.class_id == class.id
    })?;
    if delete_result.deleted_count == 0 {
        return Err(ApiError::NotFound("selection".to_string()));
    }

    let enrolled_result = txn.insert(Enrollment::from_snapshot(
        ObjectId::generate(),
        &class,
        &request.email,
    ))?;

    let update_seats = txn.update_one::<Class>(
        class.id,
        |c| c.seats > 0,
        |c| {
            c.seats -= 1;
            c.total_student = c.total_student.saturating_add(1);
        },
    )?;
    if !update_seats.matched() {
        return Err(ApiError::CapacityExceeded);
    }

    Ok(EnrollmentReceipt {
        insert_result,
        delete_result,
        update_seats,
        enrolled_result,
    })
}

/// A user's payments, newest first.
pub fn payment_history(db: &Database, email: &str) -> Result<Vec<Payment>, ApiError> {
    let mut payments = db.read(|c| c.payments.find(|p| p.email == email))?;
    payments.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    Ok(payments)
}

/// A user's enrollments.
pub fn enrollments_for(db: &Database, email: &str) -> Result<Vec<Enrollment>, ApiError> {
    Ok(db.read(|c| c.enrollments.find(|e| e.email == email))?)
}
