pub mod health;
pub mod payments;
pub mod requests;

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::services::orders::OrderService;
use crate::services::payments::PaymentService;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Header carrying the caller identity asserted by the upstream gateway.
pub const CONSUMER_HEADER: &str = "x-consumer-username";

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<OrderService>,
    pub payments: Arc<PaymentService>,
}

/// Extracts the asserted caller identity from the consumer header. A missing
/// or non-UTF-8 header means no identity; validation happens downstream.
pub fn caller_identity(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONSUMER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
