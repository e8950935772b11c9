use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::errors::ServiceError;

/// Profile returned by the remote user service for an asserted identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub is_admin: bool,
}

/// Remote identity oracle consulted before every privileged operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn get_user(&self, email: &str) -> Result<UserProfile, ServiceError>;
}

/// HTTP-backed identity client.
#[derive(Clone)]
pub struct HttpIdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpIdentityClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityClient {
    #[instrument(skip(self))]
    async fn get_user(&self, email: &str) -> Result<UserProfile, ServiceError> {
        let url = format!("{}/users/{}", self.base_url, email);
        let response = self.http.get(&url).send().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("identity service unreachable: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "identity service returned {} for {}",
                response.status(),
                email
            )));
        }

        response.json::<UserProfile>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!("invalid identity service response: {e}"))
        })
    }
}
