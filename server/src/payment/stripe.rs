//! Stripe REST client.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use super::{ChargeIntent, PAYER_KEY, PaymentError, PaymentProvider};

/// Charge intents through Stripe's `/v1/payment_intents` API.
pub struct StripeClient {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl std::fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl StripeClient {
    /// Create a client for the API rooted at `api_base`
    /// (e.g. `https://api.stripe.com`).
    pub fn new(
        api_base: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.api_base)
    }

    async fn decode(response: Response) -> Result<ChargeIntent, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|parsed| parsed.error.message)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<ChargeIntent>()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        payer: &str,
    ) -> Result<ChargeIntent, PaymentError> {
        let amount = amount.to_string();
        let payer_field = format!("metadata[{PAYER_KEY}]");
        let response = self
            .client
            .post(self.intents_url())
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount.as_str()),
                ("currency", currency),
                ("payment_method_types[]", "card"),
                (payer_field.as_str(), payer),
            ])
            .send()
            .await?;
        let intent = Self::decode(response).await?;
        tracing::debug!("created charge intent {} for {amount} {currency}", intent.id);
        Ok(intent)
    }

    async fn retrieve_intent(&self, id: &str) -> Result<ChargeIntent, PaymentError> {
        let response = self
            .client
            .get(format!("{}/{id}", self.intents_url()))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::decode(response).await
    }
}
