use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::Value;

use super::AppState;
use crate::auth::{JwtError, issue_token};
use crate::error::ApiError;

#[derive(Serialize)]
pub struct TokenResponse {
    token: String,
}

/// `POST /jwt`: sign whatever identity object the client sends.
pub async fn issue(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    let Value::Object(claims) = payload else {
        return Err(ApiError::BadRequest("expected a JSON object".to_string()));
    };

    let token = issue_token(claims, &state.tokens).map_err(|e| match e {
        JwtError::MissingEmailClaim => ApiError::BadRequest("email is required".to_string()),
        other => ApiError::from(other),
    })?;
    Ok(Json(TokenResponse { token }))
}
