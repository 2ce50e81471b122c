//! Role directory.
//!
//! Users are keyed by email and carry a single role. A user record is
//! created on first sign-in and only ever changes through promotion.
//!
//! # Invariants
//! - At most one user exists per email.
//! - New users are always members, whatever the request says.

use crate::auth::{AuthenticatedUser, require_same_identity};
use crate::error::ApiError;
use crate::storage::{Database, InsertResult, StoreError, UpdateResult};
use crate::types::{NewUser, ObjectId, Role, User};

/// Every user, oldest first.
pub fn list_users(db: &Database) -> Result<Vec<User>, ApiError> {
    Ok(db.read(|c| c.users.iter().cloned().collect())?)
}

/// Every user with the instructor role.
pub fn list_instructors(db: &Database) -> Result<Vec<User>, ApiError> {
    Ok(db.read(|c| c.users.find(|u| u.role == Role::Instructor))?)
}

/// The stored role of `email`, if the user exists.
pub fn role_of(db: &Database, email: &str) -> Result<Option<Role>, StoreError> {
    db.read(|c| c.users.find_one(|u| u.email == email).map(|u| u.role))
}

/// Whether the caller, asking about their own `email`, holds `role`.
///
/// Unknown users hold no role.
pub fn role_flag(
    db: &Database,
    caller: &AuthenticatedUser,
    email: &str,
    role: Role,
) -> Result<bool, ApiError> {
    require_same_identity(caller, email)?;
    Ok(role_of(db, email)? == Some(role))
}

/// Reject the request unless the caller's stored role is `role`.
pub fn require_role(db: &Database, caller: &AuthenticatedUser, role: Role) -> Result<(), ApiError> {
    if role_of(db, caller.email())? == Some(role) {
        Ok(())
    } else {
        tracing::debug!("{} lacks role {role}", caller.email());
        Err(ApiError::Forbidden)
    }
}

/// Record a user on first sign-in.
///
/// # Errors
/// `Conflict` if a user with the same email exists; `BadRequest` if the
/// email is empty.
pub fn upsert_user(db: &Database, new_user: NewUser) -> Result<InsertResult, ApiError> {
    if new_user.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }

    db.transaction(|txn| {
        if txn
            .find_one::<User>(|u| u.email == new_user.email)
            .is_some()
        {
            return Err(ApiError::Conflict("user already exists".to_string()));
        }
        let user = new_user.into_user(ObjectId::generate());
        tracing::info!("new user {}", user.email);
        Ok(txn.insert(user)?)
    })
}

/// Give the user with `id` a new role.
pub fn promote(db: &Database, id: ObjectId, role: Role) -> Result<UpdateResult, ApiError> {
    let result = db.transaction(|txn| txn.update_one::<User>(id, |_| true, |u| u.role = role))?;
    if !result.matched() {
        return Err(ApiError::NotFound("user".to_string()));
    }
    tracing::info!("user {id} is now {role}");
    Ok(result)
}
