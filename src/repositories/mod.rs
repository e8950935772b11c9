//! Persistent store boundary.
//!
//! The orchestrator owns no state of its own; everything durable lives
//! behind `ShopRepository`. The trait keeps the store mockable so the
//! orchestration logic can be exercised without a database.

pub mod shop_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::{payment, request};
use crate::errors::ServiceError;

pub use shop_repository::SeaOrmShopRepository;

/// Candidate request row, before the store assigns identity and timestamp.
#[derive(Clone, Debug)]
pub struct NewRequest {
    pub payment_id: String,
    pub price: Decimal,
    pub tax: Decimal,
    pub status: String,
    pub store_id: i32,
    pub product_id: i32,
    pub user_id: i32,
}

/// Mutable fields of a request; everything else is immutable after creation.
#[derive(Clone, Debug, Default)]
pub struct RequestChanges {
    pub status: Option<String>,
    pub track: Option<String>,
}

/// Mandatory scope for request searches.
#[derive(Clone, Copy, Debug)]
pub enum RequestScope {
    Store(i32),
    User(i32),
}

/// Conjunctive filter predicates for request searches. Date bounds are
/// exclusive on both ends.
#[derive(Clone, Debug)]
pub struct RequestFilter {
    pub scope: RequestScope,
    pub status: Option<String>,
    pub exclude_status: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

/// Candidate payment row for the direct-persistence variant.
#[derive(Clone, Debug)]
pub struct NewPayment {
    pub total: Decimal,
    pub pix: String,
    pub status: String,
    pub store_id: i32,
    pub product_id: i32,
}

/// Conjunctive filter predicates for payment searches.
#[derive(Clone, Debug, Default)]
pub struct PaymentFilter {
    pub status: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// Persists one request; the store assigns `id` and `created_at`.
    async fn insert_request(&self, item: NewRequest) -> Result<request::Model, ServiceError>;

    /// First-or-not-found lookup by identity, then applies `changes`.
    async fn update_request(
        &self,
        id: i32,
        changes: RequestChanges,
    ) -> Result<request::Model, ServiceError>;

    async fn search_requests(
        &self,
        filter: RequestFilter,
    ) -> Result<Vec<request::Model>, ServiceError>;

    async fn requests_by_payment(
        &self,
        payment_id: &str,
    ) -> Result<Vec<request::Model>, ServiceError>;

    /// Bulk status transition for every request under `payment_id` currently
    /// in `from`; returns the number of rows affected.
    async fn transition_requests_by_payment(
        &self,
        payment_id: &str,
        from: &str,
        to: &str,
    ) -> Result<u64, ServiceError>;

    async fn insert_payment(&self, item: NewPayment) -> Result<payment::Model, ServiceError>;

    /// First-or-not-found lookup by identity, then replaces `status`.
    async fn update_payment_status(
        &self,
        id: i32,
        status: String,
    ) -> Result<payment::Model, ServiceError>;

    async fn payments_by_store(&self, store_id: i32)
        -> Result<Vec<payment::Model>, ServiceError>;

    async fn search_payments(
        &self,
        filter: PaymentFilter,
    ) -> Result<Vec<payment::Model>, ServiceError>;
}
