//! Database query timeout helpers
//!
//! Single statements go through [`with_default_timeout`]. The registration
//! transaction, which holds a row lock on its tournament, is bounded as a
//! whole by [`with_transaction_timeout`].

use crate::errors::{RegistryError, RegistryResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Default timeout for database queries (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for a whole locking transaction (10 seconds)
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for timeout operations
#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    /// Operation timed out
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for timeout operations
pub type TimeoutResult<T> = Result<T, TimeoutError>;

/// Execute a query with timeout
///
/// # Example
///
/// ```no_run
/// use tournaments::db::timeouts::{with_timeout, DEFAULT_QUERY_TIMEOUT};
/// # use sqlx::PgPool;
/// # async fn example(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
///
/// let result = with_timeout(
///     DEFAULT_QUERY_TIMEOUT,
///     sqlx::query("SELECT * FROM tournaments WHERE id = $1")
///         .bind(1_i64)
///         .fetch_optional(pool)
/// ).await?;
///
/// # Ok(())
/// # }
/// ```
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> TimeoutResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match timeout(duration, future).await {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(e)) => Err(TimeoutError::Database(e)),
        Err(_) => Err(TimeoutError::Timeout(duration)),
    }
}

/// Execute a query with default timeout (5 seconds)
pub async fn with_default_timeout<F, T>(future: F) -> TimeoutResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}

/// Bound a multi-statement unit of work that already speaks `RegistryError`
///
/// Dropping the future on timeout drops its open transaction, which rolls
/// it back and releases any row locks.
pub async fn with_transaction_timeout<F, T>(future: F) -> RegistryResult<T>
where
    F: Future<Output = RegistryResult<T>>,
{
    bounded(DEFAULT_TRANSACTION_TIMEOUT, future).await
}

async fn bounded<F, T>(duration: Duration, future: F) -> RegistryResult<T>
where
    F: Future<Output = RegistryResult<T>>,
{
    timeout(duration, future)
        .await
        .map_err(|_| RegistryError::Timeout(duration))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_timeout() {
        let result = with_default_timeout(async { Ok::<_, sqlx::Error>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_database_error_passes_through() {
        let result: TimeoutResult<()> =
            with_default_timeout(async { Err(sqlx::Error::RowNotFound) }).await;
        assert!(matches!(result, Err(TimeoutError::Database(_))));
    }

    #[tokio::test]
    async fn test_slow_query_times_out() {
        let result = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, TimeoutError::Timeout(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_stalled_transaction_times_out() {
        let limit = Duration::from_millis(10);
        let result: RegistryResult<()> = bounded(limit, async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(RegistryError::Timeout(d)) if d == limit));
    }

    #[tokio::test]
    async fn test_transaction_error_passes_through() {
        let result: RegistryResult<()> =
            with_transaction_timeout(async { Err(RegistryError::CapacityReached { max_players: 2 }) })
                .await;
        assert!(matches!(result, Err(RegistryError::CapacityReached { .. })));
    }
}
