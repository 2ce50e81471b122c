//! Class catalog.
//!
//! Classes are created by instructors in `pending` status and approved or
//! denied by an admin exactly once.
//!
//! # Invariants
//! - Status only moves `pending -> approved` or `pending -> denied`.
//! - A class carries feedback iff it is denied.
//! - `totalStudent` only changes through single conditional writes.

use std::cmp::Reverse;

use crate::auth::{AuthenticatedUser, require_same_identity};
use crate::error::ApiError;
use crate::roles::require_role;
use crate::storage::{Database, InsertResult, UpdateResult};
use crate::types::{Class, ClassDraft, ClassStatus, ClassUpdate, ObjectId, Role, StatusChange};

/// Number of classes `/popularClass` returns by default.
pub const POPULAR_LIMIT: usize = 6;

fn not_found() -> ApiError {
    ApiError::NotFound("class".to_string())
}

pub fn list_all(db: &Database) -> Result<Vec<Class>, ApiError> {
    Ok(db.read(|c| c.classes.iter().cloned().collect())?)
}

pub fn list_approved(db: &Database) -> Result<Vec<Class>, ApiError> {
    Ok(db.read(|c| c.classes.find(|class| class.status == ClassStatus::Approved))?)
}

/// The `limit` approved classes with the most students.
pub fn list_popular(db: &Database, limit: usize) -> Result<Vec<Class>, ApiError> {
    let mut classes = list_approved(db)?;
    classes.sort_by_key(|class| (Reverse(class.total_student), class.id));
    classes.truncate(limit);
    Ok(classes)
}

pub fn get_by_id(db: &Database, id: ObjectId) -> Result<Class, ApiError> {
    db.read(|c| c.classes.get(id).cloned())?.ok_or_else(not_found)
}

/// Classes taught by the caller.
pub fn list_by_instructor(
    db: &Database,
    caller: &AuthenticatedUser,
    email: &str,
) -> Result<Vec<Class>, ApiError> {
    require_same_identity(caller, email)?;
    Ok(db.read(|c| c.classes.find(|class| class.instructor_email == email))?)
}

/// Add a class on behalf of the instructor who will teach it.
pub fn create(
    db: &Database,
    caller: &AuthenticatedUser,
    draft: ClassDraft,
) -> Result<InsertResult, ApiError> {
    require_same_identity(caller, &draft.instructor_email)?;
    require_role(db, caller, Role::Instructor)?;
    validate_draft(&draft)?;

    let class = draft.into_class(ObjectId::generate());
    let (id, instructor) = (class.id, class.instructor_email.clone());
    let result = db.transaction(|txn| txn.insert(class))?;
    tracing::info!("class {id} created by {instructor}");
    Ok(result)
}

fn validate_draft(draft: &ClassDraft) -> Result<(), ApiError> {
    if draft.class_name.trim().is_empty() {
        return Err(ApiError::BadRequest("className is required".to_string()));
    }
    validate_price(draft.price)?;

    let denied = draft.status == Some(ClassStatus::Denied);
    let has_feedback = draft.feedback.as_deref().is_some_and(|f| !f.trim().is_empty());
    if denied != has_feedback {
        return Err(ApiError::BadRequest(
            "feedback is given exactly when a class is denied".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ApiError::BadRequest(
            "price must be a non-negative number".to_string(),
        ))
    }
}

/// Turn the `status`/`feedback` pair of a request into a decision.
///
/// Blank feedback counts as none.
pub fn parse_status_change(
    status: &str,
    feedback: Option<String>,
) -> Result<StatusChange, ApiError> {
    let feedback = feedback.filter(|f| !f.trim().is_empty());
    match (status, feedback) {
        ("approved", None) => Ok(StatusChange::Approve),
        ("approved", Some(_)) => Err(ApiError::BadRequest(
            "an approval takes no feedback".to_string(),
        )),
        ("denied", Some(feedback)) => Ok(StatusChange::Deny { feedback }),
        ("denied", None) => Err(ApiError::BadRequest(
            "a denial needs feedback".to_string(),
        )),
        (other, _) => Err(ApiError::BadRequest(format!(
            "status must be approved or denied, got '{other}'"
        ))),
    }
}

/// Apply an admin decision to a pending class.
pub fn set_status(
    db: &Database,
    id: ObjectId,
    change: StatusChange,
) -> Result<UpdateResult, ApiError> {
    let target = change.target();
    let result = db.transaction(|txn| {
        let current = txn.get::<Class>(id).ok_or_else(not_found)?;
        if current.status != ClassStatus::Pending {
            return Err(ApiError::InvalidTransition {
                from: current.status,
                to: target,
            });
        }
        Ok(txn.update_one::<Class>(
            id,
            |class| class.status == ClassStatus::Pending,
            |class| {
                class.status = target;
                class.feedback = match change {
                    StatusChange::Approve => None,
                    StatusChange::Deny { feedback } => Some(feedback),
                };
            },
        )?)
    })?;
    tracing::info!("class {id} is now {target}");
    Ok(result)
}

/// Overwrite a class's price and seat count.
pub fn update_price_and_seats(
    db: &Database,
    id: ObjectId,
    update: ClassUpdate,
) -> Result<UpdateResult, ApiError> {
    validate_price(update.price)?;
    let result = db.transaction(|txn| {
        txn.update_one::<Class>(
            id,
            |_| true,
            |class| {
                class.price = update.price;
                class.seats = update.seats;
            },
        )
    })?;
    if !result.matched() {
        return Err(not_found());
    }
    Ok(result)
}

/// Count one more student for the class.
pub fn increment_enrollment(db: &Database, id: ObjectId) -> Result<UpdateResult, ApiError> {
    let result = db.transaction(|txn| {
        txn.update_one::<Class>(
            id,
            |_| true,
            |class| class.total_student = class.total_student.saturating_add(1),
        )
    })?;
    if !result.matched() {
        return Err(not_found());
    }
    Ok(result)
}
