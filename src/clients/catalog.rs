use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::errors::ServiceError;

/// Catalog image reference, ordered within a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: i32,
    pub image_path: String,
    pub product_id: i32,
}

/// Denormalized catalog snapshot embedded into enriched search results.
/// The orchestrator only reads these; the catalog owns them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductDetail {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub categories: String,
    pub size: String,
    pub price: Decimal,
    pub tax: Decimal,
    pub available: bool,
    pub store_id: i32,
    pub images: Vec<ProductImage>,
}

/// Remote product catalog: detail reads for enrichment and availability
/// mutation during order confirmation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get_product(&self, id: i32) -> Result<ProductDetail, ServiceError>;
    async fn mark_unavailable(&self, id: i32) -> Result<(), ServiceError>;
}

/// HTTP-backed catalog client.
#[derive(Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn get_product(&self, id: i32) -> Result<ProductDetail, ServiceError> {
        let url = format!("{}/products/{}", self.base_url, id);
        let response = self.http.get(&url).send().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("catalog service unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "catalog service returned {} for product {}",
                response.status(),
                id
            )));
        }

        response.json::<ProductDetail>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("invalid catalog response: {e}"))
        })
    }

    #[instrument(skip(self))]
    async fn mark_unavailable(&self, id: i32) -> Result<(), ServiceError> {
        let url = format!("{}/products/{}/unavailable", self.base_url, id);
        let response = self.http.put(&url).send().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("catalog service unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "catalog service returned {} marking product {} unavailable",
                response.status(),
                id
            )));
        }

        Ok(())
    }
}
