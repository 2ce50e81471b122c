//! JWT issuance and verification.
//!
//! Tokens are HS256-signed JSON objects. The issuer accepts an arbitrary
//! identity payload from the client and adds `iat` and `exp`.
//!
//! # Pre-conditions
//! - The payload must contain a non-empty string `email` claim.
//! - The JWT must be a valid, properly formatted token.
//!
//! # Post-conditions
//! - On success, verification returns the email plus every other claim.
//! - On failure, returns a descriptive error indicating what went wrong.
//!
//! # Invariants
//! - Verification is stateless and does not modify any external state.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde_json::{Map, Value};

use super::TokenConfig;

/// The verified identity behind a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Value of the `email` claim.
    pub email: String,
    /// Every claim in the token, `email`, `iat` and `exp` included.
    pub claims: Map<String, Value>,
}

/// Error returned when issuing or verifying a JWT fails.
#[derive(Debug)]
pub enum JwtError {
    /// The JWT signature is invalid.
    InvalidSignature,
    /// The JWT has expired.
    TokenExpired,
    /// The JWT is malformed or cannot be parsed.
    MalformedToken,
    /// The 'email' claim is missing or empty.
    MissingEmailClaim,
    /// The key material could not be used.
    InvalidKey(String),
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSignature => write!(f, "invalid JWT signature"),
            Self::TokenExpired => write!(f, "JWT has expired"),
            Self::MalformedToken => write!(f, "malformed JWT"),
            Self::MissingEmailClaim => write!(f, "missing 'email' claim in JWT"),
            Self::InvalidKey(reason) => write!(f, "invalid key: {reason}"),
        }
    }
}

impl std::error::Error for JwtError {}

/// Sign `payload` into a token that expires after the configured lifetime.
///
/// Any `iat`/`exp` the caller supplied are overwritten.
///
/// # Errors
/// Returns `JwtError::MissingEmailClaim` if the payload has no usable email.
pub fn issue_token(
    mut payload: Map<String, Value>,
    config: &TokenConfig,
) -> Result<String, JwtError> {
    if email_claim(&payload).is_none() {
        return Err(JwtError::MissingEmailClaim);
    }

    let now = unix_now();
    payload.insert("iat".to_string(), Value::from(now));
    payload.insert(
        "exp".to_string(),
        Value::from(now + config.lifetime().as_secs()),
    );

    encode(
        &Header::new(Algorithm::HS256),
        &payload,
        &EncodingKey::from_secret(config.secret()),
    )
    .map_err(|e| JwtError::InvalidKey(e.to_string()))
}

/// Verify a token's signature and expiry and extract the identity.
///
/// # Errors
/// Returns `JwtError` if verification fails for any reason.
pub fn verify_token(token: &str, config: &TokenConfig) -> Result<Identity, JwtError> {
    if config.secret().is_empty() {
        return Err(JwtError::InvalidKey("secret must be non-empty".to_string()));
    }

    let key = DecodingKey::from_secret(config.secret());
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Map<String, Value>>(token, &key, &validation).map_err(map_jwt_error)?;

    let claims = token_data.claims;
    let email = email_claim(&claims).ok_or(JwtError::MissingEmailClaim)?;
    Ok(Identity { email, claims })
}

fn email_claim(claims: &Map<String, Value>) -> Option<String> {
    claims
        .get("email")
        .and_then(Value::as_str)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Maps jsonwebtoken errors to our JwtError type.
fn map_jwt_error(error: jsonwebtoken::errors::Error) -> JwtError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => JwtError::MalformedToken,
        _ => JwtError::MalformedToken,
    }
}
