use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// One priced line item submitted to the remote payment processor.
/// Quantity is always 1 in this marketplace; the unit price already
/// includes tax.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Remote payment processor. Called exactly once per order creation with the
/// full line-item list; returns an opaque payment identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment(&self, items: Vec<PaymentItem>) -> Result<String, ServiceError>;
}

#[derive(Serialize)]
struct CreatePaymentBody {
    items: Vec<PaymentItem>,
}

#[derive(Deserialize)]
struct CreatePaymentReply {
    id: String,
}

/// HTTP-backed payment processor client.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    async fn create_payment(&self, items: Vec<PaymentItem>) -> Result<String, ServiceError> {
        let url = format!("{}/payments", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&CreatePaymentBody { items })
            .send()
            .await
            .map_err(|e| {
                ServiceError::ExternalServiceError(format!("payment service unreachable: {e}"))
            })?;

        if !response.status().is_success() {
            return Err(ServiceError::PaymentFailed(format!(
                "payment service returned {}",
                response.status()
            )));
        }

        let reply = response.json::<CreatePaymentReply>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("invalid payment service response: {e}"))
        })?;

        Ok(reply.id)
    }
}
