//! Selection ledger: each user's cart of chosen, unpaid classes.
//!
//! # Invariants
//! - At most one selection exists per (email, class) pair.
//! - No selection exists for a class the user is already enrolled in.
//! - Only approved classes can be selected.

use crate::auth::{AuthenticatedUser, require_same_identity};
use crate::error::ApiError;
use crate::storage::{Database, DeleteResult, InsertResult};
use crate::types::{Class, ClassStatus, Enrollment, NewSelection, ObjectId, Selection};

/// The caller's cart. Without an email there is nothing to show.
pub fn list_for_user(
    db: &Database,
    caller: &AuthenticatedUser,
    email: Option<&str>,
) -> Result<Vec<Selection>, ApiError> {
    let Some(email) = email.filter(|e| !e.is_empty()) else {
        return Ok(Vec::new());
    };
    require_same_identity(caller, email)?;
    Ok(db.read(|c| c.selections.find(|s| s.email == email))?)
}

/// Put a class in a user's cart.
///
/// Display fields the client left out are filled in from the class.
pub fn add(db: &Database, new_selection: NewSelection) -> Result<InsertResult, ApiError> {
    if new_selection.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    db.transaction(|txn| {
        let class = txn
            .get::<Class>(new_selection.class_id)
            .ok_or_else(|| ApiError::NotFound("class".to_string()))?;
        if class.status != ClassStatus::Approved {
            return Err(ApiError::Conflict("class is not open for enrollment".to_string()));
        }
        let (email, class_id) = (new_selection.email.as_str(), class.id);

        if txn
            .find_one::<Selection>(|s| s.email == email && s.class_id == class_id)
            .is_some()
        {
            return Err(ApiError::Conflict("class already selected".to_string()));
        }
        if txn
            .find_one::<Enrollment>(|e| e.email == email && e.class_id == class_id)
            .is_some()
        {
            return Err(ApiError::Conflict("already enrolled in this class".to_string()));
        }

        let mut selection = new_selection.into_selection(ObjectId::generate());
        selection
            .class_name
            .get_or_insert_with(|| class.class_name.clone());
        if selection.class_image.is_none() {
            selection.class_image.clone_from(&class.class_image);
        }
        selection
            .instructor_name
            .get_or_insert_with(|| class.instructor_name.clone());
        selection.price.get_or_insert(class.price);
        Ok(txn.insert(selection)?)
    })
}

/// Take a selection out of the cart.
pub fn remove(db: &Database, id: ObjectId) -> Result<DeleteResult, ApiError> {
    Ok(db.transaction(|txn| txn.delete_one::<Selection>(id, |_| true))?)
}
