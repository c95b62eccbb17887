use thiserror::Error;

#[cfg(feature = "sqlite")]
use deadpool_sqlite::rusqlite;

/// Error taxonomy for the data-access layer.
///
/// Three failure categories are surfaced to callers, matching what the
/// boundary layer needs to distinguish: the backend could not be reached,
/// the backend rejected a statement, or the transaction machinery itself
/// failed. Backend diagnostics are preserved in the message so the
/// operational log keeps the original cause; the boundary layer is
/// responsible for never echoing them to external callers.
#[derive(Debug, Error)]
pub enum DbAccessError {
    /// Pool exhausted, backend unreachable, or the liveness-probe retry
    /// budget was spent without obtaining a usable connection.
    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// The backend rejected the SQL or procedure call (syntax error,
    /// constraint violation, type mismatch), or a named placeholder had no
    /// bound value. Carries the original backend diagnostic text.
    #[error("statement failed: {0}")]
    StatementFailed(String),

    /// Commit or rollback itself failed.
    #[error("transaction aborted: {0}")]
    TransactionAborted(String),

    /// Invalid options or missing environment configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

#[cfg(feature = "mssql")]
impl From<tiberius::error::Error> for DbAccessError {
    fn from(err: tiberius::error::Error) -> Self {
        DbAccessError::StatementFailed(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for DbAccessError {
    fn from(err: rusqlite::Error) -> Self {
        DbAccessError::StatementFailed(err.to_string())
    }
}

/// The interact worker disappearing means the connection is gone, not that
/// the statement was bad.
#[cfg(feature = "sqlite")]
impl From<deadpool_sqlite::InteractError> for DbAccessError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        DbAccessError::ConnectionUnavailable(format!("SQLite interact error: {err}"))
    }
}
