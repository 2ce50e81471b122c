//! Server configuration module.
//!
//! This module provides configuration loading for the booking server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `ACCESS_TOKEN_SECRET`: Shared secret used to sign and verify access tokens (required)
//! - `ACCESS_TOKEN_TTL_SECONDS`: Access token lifetime in seconds (default: `3600`)
//! - `PAYMENT_SECRET_KEY`: Secret API key for the payment provider (required)
//! - `PAYMENT_API_BASE`: Base URL of the payment provider API (default: `https://api.stripe.com`)
//! - `DATA_DIRECTORY`: Directory where the store snapshot is kept (default: `./data`)
//! - `PORT`: Port to listen on (default: `5000`)
//!
//! # Invariants
//!
//! - `access_token_secret` and `payment_secret_key` are never empty
//! - `listen_port` is always a valid port number

use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
///
/// Contains all configuration parameters needed to run the booking server.
///
/// # Pre-conditions
///
/// When constructed via `from_env()`:
/// - All required environment variables must be set
/// - All values must be valid for their respective types
#[derive(Clone)]
pub struct ServerConfig {
    /// HS256 secret for access tokens.
    pub access_token_secret: String,
    /// How long an issued access token stays valid.
    pub access_token_lifetime: Duration,
    /// Secret key sent to the payment provider.
    pub payment_secret_key: String,
    /// Base URL of the payment provider's REST API, without trailing slash.
    pub payment_api_base: String,
    /// Directory holding `booking.db`.
    pub data_directory: PathBuf,
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
}

// Secrets stay out of logs.
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("access_token_secret", &"<redacted>")
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("payment_secret_key", &"<redacted>")
            .field("payment_api_base", &self.payment_api_base)
            .field("data_directory", &self.data_directory)
            .field("listen_port", &self.listen_port)
            .finish()
    }
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable is missing.
    MissingEnvVar(String),
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEnvVar(name) => {
                write!(f, "missing required environment variable: {name}")
            }
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 5000;
    /// Default access token lifetime in seconds.
    pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 60 * 60;
    /// Default data directory.
    pub const DEFAULT_DATA_DIRECTORY: &'static str = "./data";
    /// Default payment provider API.
    pub const DEFAULT_PAYMENT_API_BASE: &'static str = "https://api.stripe.com";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ACCESS_TOKEN_SECRET` or `PAYMENT_SECRET_KEY` is not set or is empty
    /// - `PORT` is set but not a valid port number
    /// - `ACCESS_TOKEN_TTL_SECONDS` is set but not a whole number
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let access_token_secret = Self::load_required(&lookup, "ACCESS_TOKEN_SECRET")?;
        let access_token_lifetime = Self::load_token_lifetime(&lookup)?;
        let payment_secret_key = Self::load_required(&lookup, "PAYMENT_SECRET_KEY")?;
        let payment_api_base = lookup("PAYMENT_API_BASE")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_PAYMENT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let data_directory = lookup("DATA_DIRECTORY")
            .map_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIRECTORY), PathBuf::from);
        let listen_port = Self::load_listen_port(&lookup)?;

        Ok(Self {
            access_token_secret,
            access_token_lifetime,
            payment_secret_key,
            payment_api_base,
            data_directory,
            listen_port,
        })
    }

    /// Load a variable that must be present and non-empty.
    fn load_required(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
    ) -> Result<String, ConfigError> {
        let value = lookup(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?;

        if value.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(value)
    }

    /// Load the access token lifetime. Zero is passed through; the token
    /// configuration rejects it.
    fn load_token_lifetime(
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<Duration, ConfigError> {
        let Some(value) = lookup("ACCESS_TOKEN_TTL_SECONDS") else {
            return Ok(Duration::from_secs(Self::DEFAULT_TOKEN_TTL_SECONDS));
        };
        value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue {
                name: "ACCESS_TOKEN_TTL_SECONDS".to_string(),
                message: format!("'{value}' is not a number of seconds"),
            })
    }

    /// Load the listen port.
    ///
    /// Returns the default if not set.
    fn load_listen_port(lookup: &impl Fn(&str) -> Option<String>) -> Result<u16, ConfigError> {
        match lookup("PORT") {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port != 0 => Ok(port),
                _ => Err(ConfigError::InvalidValue {
                    name: "PORT".to_string(),
                    message: format!("'{value}' is not a valid port number (must be 1-65535)"),
                }),
            },
            None => Ok(Self::DEFAULT_PORT),
        }
    }
}
