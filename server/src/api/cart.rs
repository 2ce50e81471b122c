use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::{AppState, parse_id};
use crate::auth::AuthenticatedUser;
use crate::cart;
use crate::error::ApiError;
use crate::storage::{DeleteResult, InsertResult};
use crate::types::{NewSelection, Selection};

#[derive(Deserialize)]
pub struct CartQuery {
    email: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    query: Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Vec<Selection>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(cart::list_for_user(
        &state.db,
        &caller,
        query.email.as_deref(),
    )?))
}

pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<NewSelection>, JsonRejection>,
) -> Result<Json<InsertResult>, ApiError> {
    let Json(selection) = payload?;
    Ok(Json(cart::add(&state.db, selection)?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    Ok(Json(cart::remove(&state.db, parse_id(&id)?)?))
}
