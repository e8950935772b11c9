//! Sequential fan-out with an observable partial-failure point.
//!
//! Order creation persists items one by one, and confirmation marks products
//! unavailable one by one. Neither loop rolls back on failure; the outcome
//! records exactly how many operations completed so callers and tests can
//! assert how much partial work occurred instead of guessing from an opaque
//! error.

use std::future::Future;

use crate::errors::ServiceError;

/// Outcome of a sequential apply: the count of completed operations and the
/// first error, if any. Elements after the failing one are never attempted.
#[derive(Debug)]
pub struct SequentialApply {
    pub completed: usize,
    pub error: Option<ServiceError>,
}

impl SequentialApply {
    /// Collapses the outcome into a plain result, discarding the count.
    pub fn into_result(self) -> Result<usize, ServiceError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.completed),
        }
    }
}

/// Applies `op` to each element in order, stopping at the first failure.
/// No rollback is attempted for already-completed operations.
pub async fn apply_sequential<T, F, Fut>(
    items: impl IntoIterator<Item = T>,
    mut op: F,
) -> SequentialApply
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<(), ServiceError>>,
{
    let mut completed = 0;
    for item in items {
        match op(item).await {
            Ok(()) => completed += 1,
            Err(err) => {
                return SequentialApply {
                    completed,
                    error: Some(err),
                }
            }
        }
    }

    SequentialApply {
        completed,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn applies_every_element_in_order() {
        let mut seen = Vec::new();
        let outcome = apply_sequential([1, 2, 3], |n| {
            seen.push(n);
            async { Ok(()) }
        })
        .await;

        assert_eq!(outcome.completed, 3);
        assert!(outcome.error.is_none());
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn stops_at_first_failure_and_reports_completed_count() {
        let mut attempted = Vec::new();
        let outcome = apply_sequential([1, 2, 3, 4], |n| {
            attempted.push(n);
            async move {
                if n == 3 {
                    Err(ServiceError::InternalError("boom".into()))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(outcome.completed, 2);
        assert!(outcome.error.is_some());
        // The element after the failure is never attempted.
        assert_eq!(attempted, vec![1, 2, 3]);
        assert!(outcome.into_result().is_err());
    }

    #[tokio::test]
    async fn empty_input_completes_with_zero() {
        let outcome = apply_sequential(Vec::<i32>::new(), |_| async { Ok(()) }).await;
        assert_eq!(outcome.into_result().unwrap(), 0);
    }
}
