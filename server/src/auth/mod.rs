//! Authentication module.
//!
//! Issues and verifies the HS256 access tokens that guard protected routes,
//! and provides the extractor and ownership check handlers use.
//!
//! # Pre-conditions
//! - The server must be configured with a non-empty shared secret.
//!
//! # Post-conditions
//! - Token configuration is immutable once loaded.
//!
//! # Invariants
//! - A request that reaches a protected handler carries a verified email.

pub mod identity;
pub mod jwt;
pub mod token_config;

pub use identity::{AuthenticatedUser, require_same_identity};
pub use jwt::{Identity, JwtError, issue_token, verify_token};
pub use token_config::{TokenConfig, TokenConfigError};
