use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use super::{AppState, parse_id};
use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::roles;
use crate::storage::{InsertResult, UpdateResult};
use crate::types::{NewUser, Role, User};

pub async fn list(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
) -> Result<Json<Vec<User>>, ApiError> {
    roles::require_role(&state.db, &caller, Role::Admin)?;
    Ok(Json(roles::list_users(&state.db)?))
}

pub async fn instructors(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(roles::list_instructors(&state.db)?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<InsertResult>, ApiError> {
    let Json(new_user) = payload?;
    Ok(Json(roles::upsert_user(&state.db, new_user)?))
}

pub async fn is_admin(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let admin = roles::role_flag(&state.db, &caller, &email, Role::Admin)?;
    Ok(Json(json!({ "admin": admin })))
}

pub async fn is_instructor(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(email): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let instructor = roles::role_flag(&state.db, &caller, &email, Role::Instructor)?;
    Ok(Json(json!({ "instructor": instructor })))
}

pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    Ok(Json(roles::promote(&state.db, parse_id(&id)?, Role::Admin)?))
}

pub async fn make_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    Ok(Json(roles::promote(&state.db, parse_id(&id)?, Role::Instructor)?))
}
