#[cfg(feature = "sqlite")]
use deadpool_sqlite::Object as SqliteObject;

#[cfg(feature = "mssql")]
use deadpool::managed::Object;
#[cfg(feature = "mssql")]
use deadpool_tiberius::Manager as TiberiusManager;

use super::DbPool;
use super::types::BackendPool;
use crate::binding::{BoundStatement, PlaceholderStyle};
use crate::error::DbAccessError;
use crate::results::ResultSet;

/// A connection checked out of the pool.
///
/// Dropping it returns the connection to the pool; [`discard`](Self::discard)
/// removes it from the pool instead (used for connections that failed a
/// probe or were left mid-transaction).
pub enum PooledConnection {
    /// SQL Server client connection
    #[cfg(feature = "mssql")]
    Mssql(Object<TiberiusManager>),
    /// `SQLite` worker-backed connection
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteObject),
}

// Manual Debug implementation because deadpool_tiberius::Manager doesn't implement Debug
impl std::fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => f.debug_tuple("Mssql").field(&"<TiberiusConnection>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => f.debug_tuple("Sqlite").field(conn).finish(),
        }
    }
}

impl DbPool {
    /// Check a live connection out of the pool.
    ///
    /// Fresh connections are handed out as-is. Previously recycled ones get a
    /// `SELECT 1` liveness probe first; a probe failure discards that
    /// connection and retries acquisition transparently until the retry
    /// budget is spent.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::ConnectionUnavailable`] when the pool cannot
    /// provide a connection or the probe retry budget is exhausted.
    pub async fn acquire(&self) -> Result<PooledConnection, DbAccessError> {
        let mut probes_left = self.probe_retries;
        loop {
            let mut conn = self.checkout().await?;
            if !conn.was_recycled() {
                return Ok(conn);
            }
            match conn.probe().await {
                Ok(()) => return Ok(conn),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding pooled connection that failed its liveness probe");
                    conn.discard();
                    if probes_left == 0 {
                        return Err(DbAccessError::ConnectionUnavailable(format!(
                            "liveness probe retry budget exhausted: {err}"
                        )));
                    }
                    probes_left -= 1;
                }
            }
        }
    }

    async fn checkout(&self) -> Result<PooledConnection, DbAccessError> {
        match &self.pool {
            #[cfg(feature = "mssql")]
            BackendPool::Mssql(pool) => {
                let conn = pool.get().await.map_err(|e| {
                    DbAccessError::ConnectionUnavailable(format!("SQL Server pool error: {e}"))
                })?;
                Ok(PooledConnection::Mssql(conn))
            }
            #[cfg(feature = "sqlite")]
            BackendPool::Sqlite(pool) => {
                let conn = pool.get().await.map_err(|e| {
                    DbAccessError::ConnectionUnavailable(format!("SQLite pool error: {e}"))
                })?;
                Ok(PooledConnection::Sqlite(conn))
            }
        }
    }
}

impl PooledConnection {
    /// Whether this connection has been handed out before.
    fn was_recycled(&self) -> bool {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(obj) => Object::metrics(obj).recycled.is_some(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(obj) => deadpool::managed::Object::metrics(obj).recycled.is_some(),
        }
    }

    /// Lightweight round-trip confirming the connection is still usable.
    pub(crate) async fn probe(&mut self) -> Result<(), DbAccessError> {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(conn) => {
                tiberius::Query::new("SELECT 1")
                    .query(&mut **conn)
                    .await
                    .map_err(|e| {
                        DbAccessError::ConnectionUnavailable(format!("liveness probe failed: {e}"))
                    })?
                    .into_row()
                    .await
                    .map_err(|e| {
                        DbAccessError::ConnectionUnavailable(format!("liveness probe failed: {e}"))
                    })?;
                Ok(())
            }
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => {
                conn.interact(|raw| {
                    raw.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                        .map(|_| ())
                })
                .await
                .map_err(|e| {
                    DbAccessError::ConnectionUnavailable(format!("liveness probe failed: {e}"))
                })?
                .map_err(|e| {
                    DbAccessError::ConnectionUnavailable(format!("liveness probe failed: {e}"))
                })
            }
        }
    }

    /// Remove this connection from the pool instead of returning it.
    pub(crate) fn discard(self) {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(obj) => drop(Object::take(obj)),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(obj) => drop(deadpool::managed::Object::take(obj)),
        }
    }

    pub(crate) fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => PlaceholderStyle::Mssql,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => PlaceholderStyle::Sqlite,
        }
    }

    pub(crate) fn begin_statement(&self) -> &'static str {
        match self {
            // Isolation is pinned explicitly rather than inherited from the
            // connection's previous unit of work.
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => {
                "SET TRANSACTION ISOLATION LEVEL READ COMMITTED;\nBEGIN TRANSACTION;"
            }
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "BEGIN DEFERRED;",
        }
    }

    pub(crate) fn commit_statement(&self) -> &'static str {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => "COMMIT TRANSACTION;",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "COMMIT;",
        }
    }

    pub(crate) fn rollback_statement(&self) -> &'static str {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => "ROLLBACK TRANSACTION;",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "ROLLBACK;",
        }
    }

    /// Execute statement text with no parameters and no result rows.
    pub(crate) async fn execute_batch(&mut self, sql: &str) -> Result<(), DbAccessError> {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(conn) => crate::mssql::query::execute_batch(&mut **conn, sql).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::query::execute_batch(conn, sql).await,
        }
    }

    /// Run a bound read statement and collect its rows.
    pub(crate) async fn query_bound(
        &mut self,
        stmt: &BoundStatement,
    ) -> Result<ResultSet, DbAccessError> {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(conn) => crate::mssql::query::query(&mut **conn, stmt).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::query::query(conn, stmt).await,
        }
    }

    /// Run a bound statement for its side effect; returns rows affected.
    pub(crate) async fn execute_bound(
        &mut self,
        stmt: &BoundStatement,
    ) -> Result<usize, DbAccessError> {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(conn) => crate::mssql::query::execute(&mut **conn, stmt).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => crate::sqlite::query::execute(conn, stmt).await,
        }
    }
}
