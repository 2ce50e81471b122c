//! Request authentication.
//!
//! `AuthenticatedUser` is an axum extractor: a handler that takes one
//! only runs when the request carries a valid `Authorization: Bearer`
//! token. Anything else is answered with 401 before the handler body.
//!
//! # Invariants
//! - Ownership checks go through `require_same_identity` and happen before
//!   any data is read.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::{Identity, TokenConfig, verify_token};
use crate::error::ApiError;

/// The verified caller of a protected route.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<TokenConfig>::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;
        let token = bearer_token(header).ok_or(ApiError::Unauthorized)?;
        let identity = verify_token(token, &config)?;
        Ok(Self(identity))
    }
}

/// Extract the token from an `Authorization` header value.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reject the request unless the caller is the owner of `email`'s data.
pub fn require_same_identity(user: &AuthenticatedUser, email: &str) -> Result<(), ApiError> {
    if user.email() == email {
        Ok(())
    } else {
        tracing::debug!("identity mismatch: token for {} asked about {email}", user.email());
        Err(ApiError::Forbidden)
    }
}
