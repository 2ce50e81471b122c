//! HTTP-facing error type.
//!
//! Every handler returns `Result<_, ApiError>`. Lower layers keep their own
//! error enums and convert into this one at the boundary.
//!
//! # Invariants
//! - Every error response body is `{error: true, code, message}`.
//! - Internal details of 5xx errors are logged, never sent to the client.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::JwtError;
use crate::payment::PaymentError;
use crate::storage::StoreError;
use crate::types::{ClassStatus, ObjectIdError};

/// Errors returned to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// Missing, malformed or expired credentials.
    Unauthorized,
    /// The caller is authenticated but may not touch this resource.
    Forbidden,
    /// The addressed document does not exist.
    NotFound(String),
    /// The request is malformed or violates a field constraint.
    BadRequest(String),
    /// The write would duplicate an existing record.
    Conflict(String),
    /// A class status change that is not legal from the current status.
    InvalidTransition { from: ClassStatus, to: ClassStatus },
    /// The class has no seats left.
    CapacityExceeded,
    /// The provider does not report the charge as paid in full.
    PaymentNotConfirmed(String),
    /// The payment provider failed or could not be reached.
    PaymentProvider(PaymentError),
    /// The document store failed.
    Store(StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) | Self::InvalidTransition { .. } | Self::CapacityExceeded => {
                StatusCode::CONFLICT
            }
            Self::PaymentNotConfirmed(_) => StatusCode::PAYMENT_REQUIRED,
            Self::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::PaymentNotConfirmed(_) => "payment_not_confirmed",
            Self::PaymentProvider(_) => "payment_provider_error",
            Self::Store(_) => "internal",
        }
    }

    /// Message safe to show to the client.
    fn public_message(&self) -> String {
        match self {
            Self::PaymentProvider(_) => "payment provider error".to_string(),
            Self::Store(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Unauthorized Access"),
            Self::Forbidden => write!(f, "forbidden Access"),
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::BadRequest(message) | Self::Conflict(message) => write!(f, "{message}"),
            Self::InvalidTransition { from, to } => {
                write!(f, "cannot change class status from {from} to {to}")
            }
            Self::CapacityExceeded => write!(f, "class has no seats left"),
            Self::PaymentNotConfirmed(reason) => write!(f, "payment not confirmed: {reason}"),
            Self::PaymentProvider(e) => write!(f, "payment provider error: {e}"),
            Self::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PaymentProvider(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Store(e) => tracing::error!("store failure: {e}"),
            Self::PaymentProvider(e) => tracing::warn!("payment provider failure: {e}"),
            _ => tracing::debug!("request rejected ({}): {self}", status.as_u16()),
        }

        let body = json!({
            "error": true,
            "code": self.code(),
            "message": self.public_message(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        Self::PaymentProvider(e)
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        tracing::debug!("token rejected: {e}");
        Self::Unauthorized
    }
}

impl From<ObjectIdError> for ApiError {
    fn from(e: ObjectIdError) -> Self {
        Self::BadRequest(format!("malformed id: {e}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
