//! Transactional session: one checked-out connection plus one open
//! transaction, scoped to a single unit of work.
//!
//! A live `Session` is always open; committing or rolling back consumes it,
//! so a completed session cannot run further statements. The connection is
//! released on every exit path: commit and clean rollback return it to the
//! pool, a failed commit/rollback discards it, and dropping a still-open
//! session (panic or abandoned request) discards it too so the pool never
//! receives a connection stuck mid-transaction.

use crate::binding::bind_named;
use crate::error::DbAccessError;
use crate::params::ParamSet;
use crate::pool::PooledConnection;
use crate::results::ResultSet;

/// A scoped unit of work. Obtained through
/// [`DataAccess::with_session`](crate::access::DataAccess::with_session);
/// transaction boundaries are decided there and nowhere else.
#[derive(Debug)]
pub struct Session {
    conn: Option<PooledConnection>,
}

impl Session {
    /// Open a transaction on a freshly acquired connection.
    pub(crate) async fn begin(mut conn: PooledConnection) -> Result<Self, DbAccessError> {
        let stmt = conn.begin_statement();
        if let Err(err) = conn.execute_batch(stmt).await {
            conn.discard();
            return Err(err);
        }
        tracing::debug!("session opened");
        Ok(Session { conn: Some(conn) })
    }

    fn conn_mut(&mut self) -> Result<&mut PooledConnection, DbAccessError> {
        self.conn.as_mut().ok_or_else(|| {
            DbAccessError::TransactionAborted("session already completed".to_string())
        })
    }

    /// Run a parameterized read statement inside this unit of work and
    /// collect its rows in backend order.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::StatementFailed`] if binding fails or the
    /// backend rejects the statement.
    pub async fn query(&mut self, sql: &str, params: &ParamSet) -> Result<ResultSet, DbAccessError> {
        let conn = self.conn_mut()?;
        let stmt = bind_named(sql, params, conn.placeholder_style())?;
        conn.query_bound(&stmt).await
    }

    /// Run a parameterized statement for its side effect inside this unit
    /// of work; returns the backend's affected-row count.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::StatementFailed`] if binding fails or the
    /// backend rejects the statement.
    pub async fn execute(&mut self, sql: &str, params: &ParamSet) -> Result<usize, DbAccessError> {
        let conn = self.conn_mut()?;
        let stmt = bind_named(sql, params, conn.placeholder_style())?;
        conn.execute_bound(&stmt).await
    }

    /// Commit the transaction and return the connection to the pool.
    pub(crate) async fn commit(mut self) -> Result<(), DbAccessError> {
        let mut conn = self.conn.take().ok_or_else(|| {
            DbAccessError::TransactionAborted("session already completed".to_string())
        })?;
        let stmt = conn.commit_statement();
        match conn.execute_batch(stmt).await {
            Ok(()) => {
                tracing::debug!("session committed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "commit failed; discarding connection");
                conn.discard();
                Err(DbAccessError::TransactionAborted(format!(
                    "commit failed: {err}"
                )))
            }
        }
    }

    /// Roll the transaction back. A rollback failure is logged and the
    /// connection discarded; the caller's original error stays untouched.
    pub(crate) async fn rollback(mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };
        let stmt = conn.rollback_statement();
        match conn.execute_batch(stmt).await {
            Ok(()) => tracing::debug!("session rolled back"),
            Err(err) => {
                tracing::warn!(error = %err, "rollback failed; discarding connection");
                conn.discard();
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("session dropped while open; discarding its connection");
            conn.discard();
        }
    }
}
