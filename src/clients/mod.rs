//! Remote collaborator clients.
//!
//! Each remote dependency is modeled as a capability trait with a single
//! blocking (awaited) method per operation, so the orchestrator can be tested
//! against mocks without any transport in the way. The HTTP implementations
//! are thin reqwest adapters with no retry, backoff, or caching; a transport
//! failure surfaces as `ServiceError::ExternalServiceError` and fails the
//! whole operation.

pub mod catalog;
pub mod identity;
pub mod payment_gateway;

pub use catalog::{HttpCatalogClient, ProductCatalog, ProductDetail, ProductImage};
pub use identity::{HttpIdentityClient, IdentityVerifier, UserProfile};
pub use payment_gateway::{HttpPaymentGateway, PaymentGateway, PaymentItem};
