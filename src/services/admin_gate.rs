//! Uniform authorization gate for privileged operations.
//!
//! The caller identity is an explicit parameter on every privileged call; it
//! is asserted upstream by a trusted proxy and never validated here beyond
//! the remote admin lookup.

use tracing::{error, instrument};

use crate::clients::IdentityVerifier;
use crate::errors::ServiceError;

/// Resolves the asserted identity through the remote identity oracle and
/// fails unless it names an administrator. No side effects occur on failure.
#[instrument(skip(verifier))]
pub async fn ensure_admin(
    verifier: &dyn IdentityVerifier,
    caller: Option<&str>,
) -> Result<(), ServiceError> {
    let email = match caller {
        Some(email) if !email.is_empty() => email,
        _ => {
            error!("missing caller identity");
            return Err(ServiceError::Unauthorized("missing caller identity".into()));
        }
    };

    let user = verifier.get_user(email).await.map_err(|e| {
        error!(error = %e, "error getting admin");
        e
    })?;

    if !user.is_admin {
        error!(caller = %email, "unauthorized action");
        return Err(ServiceError::Unauthorized("unauthorized action".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::identity::MockIdentityVerifier;
    use crate::clients::UserProfile;

    #[tokio::test]
    async fn missing_identity_fails_without_oracle_call() {
        let verifier = MockIdentityVerifier::new();

        let err = ensure_admin(&verifier, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let err = ensure_admin(&verifier, Some("")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn non_admin_identity_is_rejected() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_get_user()
            .withf(|email| email == "user@example.com")
            .times(1)
            .returning(|_| Ok(UserProfile { is_admin: false }));

        let err = ensure_admin(&verifier, Some("user@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn oracle_failure_propagates() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_get_user()
            .times(1)
            .returning(|_| Err(ServiceError::ExternalServiceError("down".into())));

        let err = ensure_admin(&verifier, Some("admin@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn admin_identity_passes() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_get_user()
            .times(1)
            .returning(|_| Ok(UserProfile { is_admin: true }));

        ensure_admin(&verifier, Some("admin@example.com"))
            .await
            .unwrap();
    }
}
