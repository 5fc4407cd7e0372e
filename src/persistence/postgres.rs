//! Shared `PostgreSQL` plumbing for diesel-backed adapters.

use super::{RepositoryError, RepositoryResult};
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::time::Duration;

/// `PostgreSQL` connection pool shared by all adapters.
pub type FieldlinePgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool.
///
/// Pool checkout waits at most `checkout_timeout`, so a saturated pool
/// surfaces as a transient error instead of blocking indefinitely.
///
/// # Errors
///
/// Returns [`RepositoryError::Unavailable`] when the pool cannot establish
/// its initial connections.
pub fn build_pool(
    database_url: &str,
    max_size: u32,
    checkout_timeout: Duration,
) -> RepositoryResult<FieldlinePgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(checkout_timeout)
        .build(manager)
        .map_err(RepositoryError::unavailable)
}

/// Runs a blocking diesel closure on the blocking thread pool.
///
/// # Errors
///
/// Returns [`RepositoryError::Unavailable`] when no connection can be
/// checked out, or whatever error the closure produces.
pub async fn run_blocking<F, T>(pool: &FieldlinePgPool, f: F) -> RepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let owned = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = owned.get().map_err(RepositoryError::unavailable)?;
        f(&mut connection)
    })
    .await
    .map_err(RepositoryError::persistence)?
}

/// Maps a diesel error, treating dropped connections as transient.
#[must_use]
pub fn map_diesel_error(err: DieselError) -> RepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::unavailable(err)
        }
        _ => RepositoryError::persistence(err),
    }
}

/// Converts a stored `BIGINT` counter into an unsigned value.
///
/// # Errors
///
/// Returns [`RepositoryError::Persistence`] for negative values.
pub fn to_unsigned(value: i64) -> RepositoryResult<u64> {
    u64::try_from(value).map_err(RepositoryError::persistence)
}

/// Converts an unsigned value into a `BIGINT` parameter.
///
/// # Errors
///
/// Returns [`RepositoryError::Persistence`] for values above `i64::MAX`.
pub fn to_signed(value: u64) -> RepositoryResult<i64> {
    i64::try_from(value).map_err(RepositoryError::persistence)
}

/// Escapes `LIKE` metacharacters and wraps the term for substring matching.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
