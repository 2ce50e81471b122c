//! Access-token signing configuration.
//!
//! # Pre-conditions
//! - The shared secret must be non-empty.
//!
//! # Post-conditions
//! - `TokenConfig` instances are immutable once created.
//!
//! # Invariants
//! - The secret is never empty.
//! - The token lifetime is never zero.

use std::time::Duration;

/// Error returned when token configuration is invalid.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenConfigError {
    /// The HS256 secret is empty.
    EmptySecret,
    /// The token lifetime is zero.
    ZeroLifetime,
}

impl std::fmt::Display for TokenConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecret => write!(f, "HS256 secret must not be empty"),
            Self::ZeroLifetime => write!(f, "token lifetime must be positive"),
        }
    }
}

impl std::error::Error for TokenConfigError {}

/// HS256 signing/verification settings shared by every request.
///
/// The same secret both signs tokens at `/jwt` and verifies them on
/// protected routes.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenConfig {
    /// Tokens expire one hour after issue; there is no refresh.
    pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(60 * 60);

    /// Create a new HS256 configuration with the default lifetime.
    ///
    /// # Errors
    /// Returns `TokenConfigError::EmptySecret` if the secret is empty.
    pub fn new_hs256(secret: Vec<u8>) -> Result<Self, TokenConfigError> {
        if secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        Ok(Self {
            secret,
            lifetime: Self::DEFAULT_LIFETIME,
        })
    }

    /// Override the token lifetime.
    ///
    /// # Errors
    /// Returns `TokenConfigError::ZeroLifetime` for a zero duration.
    pub fn with_lifetime(self, lifetime: Duration) -> Result<Self, TokenConfigError> {
        if lifetime.is_zero() {
            return Err(TokenConfigError::ZeroLifetime);
        }
        Ok(Self { lifetime, ..self })
    }

    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
