//! The facade the request layer talks to: per-call auto-committing sessions
//! over views and stored procedures, plus an explicit unit-of-work API.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;

use crate::error::DbAccessError;
use crate::filter::{FilterSpec, build_filter_clause, select_statement};
use crate::params::ParamSet;
use crate::pool::DbPool;
use crate::procs::build_call_statement;
use crate::results::{ResultSet, Row};
use crate::session::Session;

/// Cloneable handle over the connection pool.
///
/// Stateless between calls apart from the pooled connections themselves;
/// every operation re-queries the backend, since the views and procedures
/// are the source of truth.
#[derive(Debug, Clone)]
pub struct DataAccess {
    pool: DbPool,
    correlation: Option<Arc<str>>,
}

impl DataAccess {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            correlation: None,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Attach the request layer's identity string to this handle's log
    /// records. Used for correlation only, never for access control.
    #[must_use]
    pub fn with_correlation(&self, id: impl Into<String>) -> Self {
        Self {
            pool: self.pool.clone(),
            correlation: Some(Arc::from(id.into())),
        }
    }

    fn correlation(&self) -> &str {
        self.correlation.as_deref().unwrap_or("-")
    }

    /// Run `work` inside a scoped unit of work.
    ///
    /// Acquires a connection, opens a transaction, and hands the session to
    /// `work`. A normal return commits; any failure rolls back and re-raises
    /// the original error unchanged, so a constraint violation stays
    /// distinguishable from a connectivity failure. The connection is
    /// released on every exit path. This is the only place transaction
    /// boundaries are decided.
    ///
    /// No automatic retry is attempted on deadlock or serialization
    /// failures; `work` is consumed by the attempt, so retry policy belongs
    /// to the caller.
    ///
    /// # Errors
    ///
    /// Propagates the error from `work` unchanged, or
    /// [`DbAccessError::TransactionAborted`] if the final commit fails.
    pub async fn with_session<T, F>(&self, work: F) -> Result<T, DbAccessError>
    where
        F: for<'s> FnOnce(&'s mut Session) -> BoxFuture<'s, Result<T, DbAccessError>>,
    {
        let conn = self.pool.acquire().await?;
        let mut session = Session::begin(conn).await?;
        match work(&mut session).await {
            Ok(value) => {
                session.commit().await?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(
                    correlation = self.correlation(),
                    error = %err,
                    "unit of work failed; rolling back"
                );
                session.rollback().await;
                Err(err)
            }
        }
    }

    /// Execute a parameterized read statement, returning all result rows in
    /// backend order; an empty sequence when nothing matches.
    ///
    /// The statement must carry `:name` placeholders bound through `params`;
    /// caller-supplied values are never interpolated into SQL text.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::StatementFailed`] when the backend rejects
    /// the statement, [`DbAccessError::ConnectionUnavailable`] when no
    /// connection can be obtained.
    pub async fn query_many(
        &self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<ResultSet, DbAccessError> {
        tracing::debug!(correlation = self.correlation(), "query_many");
        let sql = sql.to_string();
        let params = params.clone();
        self.with_session(move |session| {
            Box::pin(async move { session.query(&sql, &params).await })
        })
        .await
    }

    /// Execute a parameterized read statement and surface only the first
    /// row, or `None` when nothing matches.
    ///
    /// Uniqueness is not enforced here: a statement matching several rows
    /// silently yields its first.
    ///
    /// # Errors
    ///
    /// Same as [`query_many`](Self::query_many); a zero-row result is `None`,
    /// never an error.
    pub async fn query_one(
        &self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<Option<Row>, DbAccessError> {
        let result_set = self.query_many(sql, params).await?;
        Ok(result_set.into_first())
    }

    /// Invoke a stored procedure with named arguments, discarding any result
    /// rows. Runs in its own auto-committing session: the side effect is the
    /// point, so a clean return is committed.
    ///
    /// `procedure` is a trusted identifier from the routing layer.
    ///
    /// # Errors
    ///
    /// Backend rejections propagate as [`DbAccessError::StatementFailed`]
    /// with the original diagnostic attached.
    pub async fn call_void(
        &self,
        procedure: &str,
        params: &ParamSet,
    ) -> Result<(), DbAccessError> {
        tracing::debug!(
            correlation = self.correlation(),
            procedure = procedure,
            "call_void"
        );
        let sql = build_call_statement(procedure, params);
        let params = params.clone();
        self.with_session(move |session| {
            Box::pin(async move { session.execute(&sql, &params).await.map(|_| ()) })
        })
        .await
    }

    /// Invoke a stored procedure with named arguments and return its result
    /// rows unmodified, in backend order.
    ///
    /// # Errors
    ///
    /// Same propagation as [`call_void`](Self::call_void).
    pub async fn call_with_result(
        &self,
        procedure: &str,
        params: &ParamSet,
    ) -> Result<ResultSet, DbAccessError> {
        tracing::debug!(
            correlation = self.correlation(),
            procedure = procedure,
            "call_with_result"
        );
        let sql = build_call_statement(procedure, params);
        let params = params.clone();
        self.with_session(move |session| {
            Box::pin(async move { session.query(&sql, &params).await })
        })
        .await
    }

    /// Query a view with a dynamic filter: absent entries (NULL or
    /// empty-string) are dropped, the rest become parameter-bound equality
    /// predicates joined with AND.
    ///
    /// `view` is a trusted identifier from the routing layer; identifiers
    /// cannot be parameter-bound, so it is spliced into the statement text.
    ///
    /// # Errors
    ///
    /// Same propagation as [`query_many`](Self::query_many).
    pub async fn select_from_view(
        &self,
        view: &str,
        filters: &FilterSpec,
    ) -> Result<ResultSet, DbAccessError> {
        let filter = build_filter_clause(filters);
        let sql = select_statement(view, &filter);
        self.query_many(&sql, &filter.params).await
    }

    /// Report backend reachability with a trivial round-trip statement.
    /// Never fails: any error is logged and reported as `false`.
    pub async fn health_check(&self) -> bool {
        match self.ping().await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    correlation = self.correlation(),
                    error = %err,
                    "health check failed"
                );
                false
            }
        }
    }

    async fn ping(&self) -> Result<(), DbAccessError> {
        let mut conn = self.pool.acquire().await?;
        conn.probe().await
    }
}

/// The narrow contract the request layer consumes. Implemented by
/// [`DataAccess`]; boundary layers can mock it in their own tests.
#[async_trait]
pub trait ViewProcOps: Send + Sync {
    async fn query_many(&self, sql: &str, params: &ParamSet) -> Result<ResultSet, DbAccessError>;
    async fn query_one(&self, sql: &str, params: &ParamSet)
    -> Result<Option<Row>, DbAccessError>;
    async fn call_void(&self, procedure: &str, params: &ParamSet) -> Result<(), DbAccessError>;
    async fn call_with_result(
        &self,
        procedure: &str,
        params: &ParamSet,
    ) -> Result<ResultSet, DbAccessError>;
    async fn select_from_view(
        &self,
        view: &str,
        filters: &FilterSpec,
    ) -> Result<ResultSet, DbAccessError>;
    async fn health_check(&self) -> bool;
}

#[async_trait]
impl ViewProcOps for DataAccess {
    async fn query_many(&self, sql: &str, params: &ParamSet) -> Result<ResultSet, DbAccessError> {
        DataAccess::query_many(self, sql, params).await
    }

    async fn query_one(
        &self,
        sql: &str,
        params: &ParamSet,
    ) -> Result<Option<Row>, DbAccessError> {
        DataAccess::query_one(self, sql, params).await
    }

    async fn call_void(&self, procedure: &str, params: &ParamSet) -> Result<(), DbAccessError> {
        DataAccess::call_void(self, procedure, params).await
    }

    async fn call_with_result(
        &self,
        procedure: &str,
        params: &ParamSet,
    ) -> Result<ResultSet, DbAccessError> {
        DataAccess::call_with_result(self, procedure, params).await
    }

    async fn select_from_view(
        &self,
        view: &str,
        filters: &FilterSpec,
    ) -> Result<ResultSet, DbAccessError> {
        DataAccess::select_from_view(self, view, filters).await
    }

    async fn health_check(&self) -> bool {
        DataAccess::health_check(self).await
    }
}
