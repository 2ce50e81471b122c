//! Payment provider integration.
//!
//! The server never trusts a client's word that a charge went through: it
//! creates charge intents on the client's behalf and, before recording an
//! enrollment, fetches the intent back from the provider to confirm it was
//! paid in full by the user who opened it.
//!
//! # Invariants
//! - Amounts are integer minor units (cents); prices are converted with
//!   `to_minor_units` and nowhere else.
//! - Every intent the server opens carries the payer's email in its
//!   metadata under [`PAYER_KEY`].

mod stripe;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

pub use stripe::StripeClient;

/// The only currency classes are sold in.
pub const CURRENCY: &str = "usd";

/// Intent metadata key holding the email of the user who opened it.
pub const PAYER_KEY: &str = "email";

/// Lifecycle status of a charge intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

/// A charge intent as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChargeIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub amount: i64,
    #[serde(default)]
    pub amount_received: i64,
    pub currency: String,
    pub status: IntentStatus,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl ChargeIntent {
    /// Email of the user this intent was opened for.
    #[must_use]
    pub fn payer(&self) -> Option<&str> {
        self.metadata.get(PAYER_KEY).map(String::as_str)
    }

    /// Why this intent does not pay for something costing `minimum`
    /// minor units, or `None` if it does.
    #[must_use]
    pub fn shortfall(&self, minimum: i64) -> Option<String> {
        if self.status != IntentStatus::Succeeded {
            return Some(format!("charge {} has status {:?}", self.id, self.status));
        }
        if !self.currency.eq_ignore_ascii_case(CURRENCY) {
            return Some(format!("charge {} is in {}", self.id, self.currency));
        }
        if self.amount_received < minimum {
            return Some(format!(
                "charge {} received {} of {minimum}",
                self.id, self.amount_received
            ));
        }
        None
    }
}

/// Errors talking to the payment provider.
#[derive(Debug)]
pub enum PaymentError {
    /// The request could not be sent or the response not read.
    Http(reqwest::Error),
    /// The provider answered with an error status.
    Provider { status: u16, message: String },
    /// The provider's response body was not a charge intent.
    Decode(String),
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Provider { status, message } => {
                write!(f, "provider returned {status}: {message}")
            }
            Self::Decode(reason) => write!(f, "unexpected provider response: {reason}"),
        }
    }
}

impl std::error::Error for PaymentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

/// A card payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a card-only charge intent for `amount` minor units, tagged
    /// with the paying user's email.
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        payer: &str,
    ) -> Result<ChargeIntent, PaymentError>;

    /// Fetch the current state of an existing intent.
    async fn retrieve_intent(&self, id: &str) -> Result<ChargeIntent, PaymentError>;
}

/// Convert a price in major units to minor units, rounding to the nearest
/// cent. Returns `None` for prices that cannot be charged.
#[must_use]
pub fn to_minor_units(price: f64) -> Option<i64> {
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    let minor = (price * 100.0).round();
    // i64::MAX is not exactly representable; stay well below it.
    if minor < 1.0 || minor >= 9.0e15 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(minor as i64)
}

/// Whether `id` looks like a provider intent id and is safe to put in a URL
/// path.
#[must_use]
pub fn is_valid_intent_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 255
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
