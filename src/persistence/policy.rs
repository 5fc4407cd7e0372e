//! Timeout and bounded-retry policy for persistence calls.

use super::{RepositoryError, RepositoryResult};
use std::future::Future;
use std::time::Duration;

/// Bounds every persistence call by a timeout and retries idempotent calls
/// that fail transiently.
///
/// # Examples
///
/// ```
/// use fieldline::persistence::PersistencePolicy;
/// use std::time::Duration;
///
/// let policy = PersistencePolicy::new(Duration::from_secs(2), 3, Duration::from_millis(50));
/// assert_eq!(policy.max_attempts(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistencePolicy {
    timeout: Duration,
    max_attempts: u32,
    initial_backoff: Duration,
}

impl PersistencePolicy {
    /// Creates a policy. A zero attempt count is treated as one attempt.
    #[must_use]
    pub const fn new(timeout: Duration, max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            timeout,
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
            initial_backoff,
        }
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the maximum number of attempts for idempotent calls.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay before the first retry.
    #[must_use]
    pub const fn initial_backoff(&self) -> Duration {
        self.initial_backoff
    }

    /// Runs a single attempt bounded by the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Timeout`] when the call does not finish in
    /// time, or the error produced by the call itself.
    pub async fn call<T, Fut>(&self, operation: Fut) -> RepositoryResult<T>
    where
        Fut: Future<Output = RepositoryResult<T>>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_elapsed| RepositoryError::Timeout(self.timeout))?
    }

    /// Runs an idempotent call, retrying transient failures with exponential
    /// backoff until the attempt budget is spent.
    ///
    /// # Errors
    ///
    /// Returns the last error when every attempt failed transiently, or the
    /// first non-transient error.
    pub async fn call_idempotent<T, F, Fut>(&self, mut operation: F) -> RepositoryResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RepositoryResult<T>>,
    {
        let mut attempt: u32 = 1;
        let mut backoff = self.initial_backoff;
        loop {
            match self.call(operation()).await {
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "retrying transient persistence failure"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt = attempt.saturating_add(1);
                }
                result => return result,
            }
        }
    }
}

impl Default for PersistencePolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 3, Duration::from_millis(100))
    }
}
