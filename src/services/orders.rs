use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::clients::{
    IdentityVerifier, PaymentGateway, PaymentItem, ProductCatalog, ProductDetail,
};
use crate::entities::request;
use crate::errors::ServiceError;
use crate::repositories::{NewRequest, RequestChanges, RequestFilter, RequestScope, ShopRepository};

use super::admin_gate::ensure_admin;
use super::fanout::apply_sequential;
use super::{parse_date_bound, parse_id, SearchWindow, STATUS_CREATED, STATUS_PREPARING};

/// One candidate line item in an order-creation call. The caller never sets
/// the payment id or status; those are stamped during orchestration.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderItem {
    pub item_name: String,
    pub price: Decimal,
    pub tax: Decimal,
    pub store_id: i32,
    pub product_id: i32,
    pub user_id: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderInput {
    #[validate(length(min = 1, message = "order must contain at least one item"))]
    pub items: Vec<CreateOrderItem>,
}

/// Mutable request fields; price, tax and payment id are immutable.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateRequestInput {
    pub status: Option<String>,
    pub track: Option<String>,
}

/// A request as returned on read paths, optionally carrying a live catalog
/// snapshot. The snapshot is never persisted.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct RequestDetail {
    pub id: i32,
    pub payment_id: String,
    pub price: Decimal,
    pub tax: Decimal,
    pub track: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub store_id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub product: Option<ProductDetail>,
}

impl RequestDetail {
    fn from_model(model: request::Model, product: Option<ProductDetail>) -> Self {
        Self {
            id: model.id,
            payment_id: model.payment_id,
            price: model.price,
            tax: model.tax,
            track: model.track,
            status: model.status,
            created_at: model.created_at,
            store_id: model.store_id,
            product_id: model.product_id,
            user_id: model.user_id,
            product,
        }
    }
}

/// Result of an order confirmation, exposing how much of the non-atomic
/// fan-out actually completed.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmOrderOutcome {
    /// Requests transitioned from `created` to `preparing`.
    pub transitioned: u64,
    /// Distinct products marked unavailable in the catalog.
    pub products_marked: usize,
}

/// Orchestrator for the request lifecycle: order creation, confirmation,
/// updates and enriched searches. Stateless; every durable effect goes
/// through the repository, every remote effect through a client trait.
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn ShopRepository>,
    identity: Arc<dyn IdentityVerifier>,
    gateway: Arc<dyn PaymentGateway>,
    catalog: Arc<dyn ProductCatalog>,
}

impl OrderService {
    pub fn new(
        repo: Arc<dyn ShopRepository>,
        identity: Arc<dyn IdentityVerifier>,
        gateway: Arc<dyn PaymentGateway>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> Self {
        Self {
            repo,
            identity,
            gateway,
            catalog,
        }
    }

    /// Creates an order: one payment for the aggregate, then one persisted
    /// request per item, each stamped with the returned payment id and
    /// `created` status.
    ///
    /// The payment call is the unit of atomicity from the caller's point of
    /// view. Per-item persistence is sequential and not rolled back on
    /// failure; callers must treat a persistence error as a partial write.
    #[instrument(skip(self, input), fields(item_count = input.items.len()))]
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<String, ServiceError> {
        input.validate()?;
        for item in &input.items {
            if item.item_name.is_empty() {
                return Err(ServiceError::ValidationError(
                    "item name must not be empty".into(),
                ));
            }
            if item.price < Decimal::ZERO || item.tax < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "price and tax must be non-negative".into(),
                ));
            }
        }

        let line_items: Vec<PaymentItem> = input
            .items
            .iter()
            .map(|item| PaymentItem {
                title: item.item_name.clone(),
                quantity: 1,
                unit_price: item.price + item.tax,
            })
            .collect();

        let payment_id = self.gateway.create_payment(line_items).await.map_err(|e| {
            error!(error = %e, "error to create payment");
            e
        })?;

        let repo = self.repo.clone();
        let stamped_payment_id = payment_id.clone();
        let outcome = apply_sequential(input.items, |item| {
            let repo = repo.clone();
            let payment_id = stamped_payment_id.clone();
            async move {
                repo.insert_request(NewRequest {
                    payment_id,
                    price: item.price,
                    tax: item.tax,
                    status: STATUS_CREATED.to_string(),
                    store_id: item.store_id,
                    product_id: item.product_id,
                    user_id: item.user_id,
                })
                .await
                .map(|_| ())
            }
        })
        .await;

        if let Some(err) = outcome.error {
            error!(
                error = %err,
                persisted = outcome.completed,
                payment_id = %payment_id,
                "error to create request"
            );
            return Err(err);
        }

        info!(payment_id = %payment_id, items = outcome.completed, "order created");
        Ok(payment_id)
    }

    /// Confirms a payment: transitions every request under it from
    /// `created` to `preparing`, then marks each distinct product
    /// unavailable in the catalog. Already-transitioned requests are not
    /// reverted when a catalog call fails.
    #[instrument(skip(self))]
    pub async fn confirm_order(
        &self,
        payment_id: &str,
    ) -> Result<ConfirmOrderOutcome, ServiceError> {
        if payment_id.is_empty() {
            return Err(ServiceError::ValidationError(
                "payment id must not be empty".into(),
            ));
        }

        let transitioned = self
            .repo
            .transition_requests_by_payment(payment_id, STATUS_CREATED, STATUS_PREPARING)
            .await?;

        let requests = self.repo.requests_by_payment(payment_id).await?;

        let mut product_ids: Vec<i32> = Vec::new();
        for req in &requests {
            if !product_ids.contains(&req.product_id) {
                product_ids.push(req.product_id);
            }
        }

        let catalog = self.catalog.clone();
        let outcome = apply_sequential(product_ids, |product_id| {
            let catalog = catalog.clone();
            async move { catalog.mark_unavailable(product_id).await }
        })
        .await;

        if let Some(err) = outcome.error {
            error!(
                error = %err,
                payment_id = %payment_id,
                products_marked = outcome.completed,
                "error to mark products unavailable"
            );
            return Err(err);
        }

        info!(
            payment_id = %payment_id,
            transitioned,
            products_marked = outcome.completed,
            "order confirmed"
        );

        Ok(ConfirmOrderOutcome {
            transitioned,
            products_marked: outcome.completed,
        })
    }

    /// Updates a request's mutable fields. Privileged.
    #[instrument(skip(self, input))]
    pub async fn update_request(
        &self,
        caller: Option<&str>,
        id: &str,
        input: UpdateRequestInput,
    ) -> Result<request::Model, ServiceError> {
        ensure_admin(self.identity.as_ref(), caller).await?;

        let request_id = parse_id("request id", id)?;
        self.repo
            .update_request(
                request_id,
                RequestChanges {
                    status: input.status,
                    track: input.track,
                },
            )
            .await
    }

    /// Store-scoped search with catalog enrichment. Privileged. Items still
    /// in `created` status are invisible to store operators.
    #[instrument(skip(self, window))]
    pub async fn search_store_requests(
        &self,
        caller: Option<&str>,
        store_id: &str,
        window: SearchWindow,
    ) -> Result<Vec<RequestDetail>, ServiceError> {
        ensure_admin(self.identity.as_ref(), caller).await?;

        let id = parse_id("store id", store_id)?;
        self.search_and_enrich(RequestScope::Store(id), window)
            .await
    }

    /// Profile-scoped search with catalog enrichment. Not admin-gated, but a
    /// caller identity must be present.
    #[instrument(skip(self, window))]
    pub async fn search_profile_requests(
        &self,
        caller: Option<&str>,
        user_id: &str,
        window: SearchWindow,
    ) -> Result<Vec<RequestDetail>, ServiceError> {
        if caller.map_or(true, str::is_empty) {
            return Err(ServiceError::Unauthorized("missing caller identity".into()));
        }

        let id = parse_id("user id", user_id)?;
        self.search_and_enrich(RequestScope::User(id), window).await
    }

    async fn search_and_enrich(
        &self,
        scope: RequestScope,
        window: SearchWindow,
    ) -> Result<Vec<RequestDetail>, ServiceError> {
        let created_after = parse_date_bound("initial date", window.initial_date.as_deref())?;
        let created_before = parse_date_bound("end date", window.end_date.as_deref())?;

        let requests = self
            .repo
            .search_requests(RequestFilter {
                scope,
                status: window.status,
                exclude_status: Some(STATUS_CREATED.to_string()),
                created_after,
                created_before,
            })
            .await?;

        // Overwrite each snapshot with live catalog data; a single fetch
        // failure aborts the whole search.
        let mut details = Vec::with_capacity(requests.len());
        for req in requests {
            let product = self.catalog.get_product(req.product_id).await.map_err(|e| {
                error!(error = %e, product_id = req.product_id, "error to fetch product");
                e
            })?;
            details.push(RequestDetail::from_model(req, Some(product)));
        }

        Ok(details)
    }
}
