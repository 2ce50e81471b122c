use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{AppState, parse_id};
use crate::auth::AuthenticatedUser;
use crate::catalog::{self, POPULAR_LIMIT};
use crate::error::ApiError;
use crate::roles;
use crate::storage::{InsertResult, UpdateResult};
use crate::types::{Class, ClassDraft, ClassUpdate, Role};

#[derive(Deserialize)]
pub struct PopularQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct InstructorQuery {
    email: Option<String>,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    id: String,
    status: String,
    feedback: Option<String>,
}

#[derive(Deserialize)]
pub struct DenyBody {
    feedback: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Class>>, ApiError> {
    Ok(Json(catalog::list_all(&state.db)?))
}

pub async fn approved(State(state): State<AppState>) -> Result<Json<Vec<Class>>, ApiError> {
    Ok(Json(catalog::list_approved(&state.db)?))
}

pub async fn popular(
    State(state): State<AppState>,
    query: Result<Query<PopularQuery>, QueryRejection>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(POPULAR_LIMIT);
    Ok(Json(catalog::list_popular(&state.db, limit)?))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Class>, ApiError> {
    Ok(Json(catalog::get_by_id(&state.db, parse_id(&id)?)?))
}

pub async fn by_instructor(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    query: Result<Query<InstructorQuery>, QueryRejection>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let Query(query) = query?;
    let email = query
        .email
        .ok_or_else(|| ApiError::BadRequest("email is required".to_string()))?;
    Ok(Json(catalog::list_by_instructor(&state.db, &caller, &email)?))
}

pub async fn create(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    payload: Result<Json<ClassDraft>, JsonRejection>,
) -> Result<Json<InsertResult>, ApiError> {
    let Json(draft) = payload?;
    Ok(Json(catalog::create(&state.db, &caller, draft)?))
}

/// `PATCH /classes?id=&status=&feedback=`
pub async fn set_status(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    query: Result<Query<StatusQuery>, QueryRejection>,
) -> Result<Json<UpdateResult>, ApiError> {
    roles::require_role(&state.db, &caller, Role::Admin)?;
    let Query(query) = query?;
    let id = parse_id(&query.id)?;
    let change = catalog::parse_status_change(&query.status, query.feedback)?;
    Ok(Json(catalog::set_status(&state.db, id, change)?))
}

/// `POST /classes/{id}/deny` with `{feedback}`.
pub async fn deny(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<DenyBody>, JsonRejection>,
) -> Result<Json<UpdateResult>, ApiError> {
    roles::require_role(&state.db, &caller, Role::Admin)?;
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let change = catalog::parse_status_change("denied", Some(body.feedback))?;
    Ok(Json(catalog::set_status(&state.db, id, change)?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClassUpdate>, JsonRejection>,
) -> Result<Json<UpdateResult>, ApiError> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;
    Ok(Json(catalog::update_price_and_seats(&state.db, id, update)?))
}

pub async fn count_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResult>, ApiError> {
    Ok(Json(catalog::increment_enrollment(&state.db, parse_id(&id)?)?))
}
