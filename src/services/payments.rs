use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::clients::IdentityVerifier;
use crate::entities::payment;
use crate::errors::ServiceError;
use crate::repositories::{NewPayment, PaymentFilter, ShopRepository};

use super::admin_gate::ensure_admin;
use super::{parse_date_bound, parse_id, SearchWindow, STATUS_CREATED};

/// Payment shaped by the caller for the direct-persistence variant; no
/// remote processor is involved.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentInput {
    pub total: Decimal,
    #[serde(default)]
    pub pix: String,
    pub status: Option<String>,
    pub store_id: i32,
    pub product_id: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentInput {
    pub status: String,
}

/// Payment management operations. All of them are admin-gated.
#[derive(Clone)]
pub struct PaymentService {
    repo: Arc<dyn ShopRepository>,
    identity: Arc<dyn IdentityVerifier>,
}

impl PaymentService {
    pub fn new(repo: Arc<dyn ShopRepository>, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self { repo, identity }
    }

    /// Persists a payment directly and returns its store-assigned id.
    #[instrument(skip(self, input), fields(store_id = input.store_id))]
    pub async fn create_payment(
        &self,
        caller: Option<&str>,
        input: CreatePaymentInput,
    ) -> Result<i32, ServiceError> {
        ensure_admin(self.identity.as_ref(), caller).await?;

        if input.total < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "total must be non-negative".into(),
            ));
        }

        let created = self
            .repo
            .insert_payment(NewPayment {
                total: input.total,
                pix: input.pix,
                status: input
                    .status
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| STATUS_CREATED.to_string()),
                store_id: input.store_id,
                product_id: input.product_id,
            })
            .await?;

        info!(payment_id = created.id, "payment created");
        Ok(created.id)
    }

    /// Replaces a payment's status; everything else is immutable.
    #[instrument(skip(self, input))]
    pub async fn update_payment(
        &self,
        caller: Option<&str>,
        id: &str,
        input: UpdatePaymentInput,
    ) -> Result<payment::Model, ServiceError> {
        ensure_admin(self.identity.as_ref(), caller).await?;

        let payment_id = parse_id("payment id", id)?;
        self.repo
            .update_payment_status(payment_id, input.status)
            .await
    }

    /// Lists every payment belonging to a store.
    #[instrument(skip(self))]
    pub async fn store_payments(
        &self,
        caller: Option<&str>,
        store_id: &str,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        ensure_admin(self.identity.as_ref(), caller).await?;

        let id = parse_id("store id", store_id)?;
        self.repo.payments_by_store(id).await
    }

    /// Unscoped payment search by status and creation window.
    #[instrument(skip(self, window))]
    pub async fn search_payments(
        &self,
        caller: Option<&str>,
        window: SearchWindow,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        ensure_admin(self.identity.as_ref(), caller).await?;

        let created_after = parse_date_bound("initial date", window.initial_date.as_deref())?;
        let created_before = parse_date_bound("end date", window.end_date.as_deref())?;

        self.repo
            .search_payments(PaymentFilter {
                status: window.status,
                created_after,
                created_before,
            })
            .await
    }
}
