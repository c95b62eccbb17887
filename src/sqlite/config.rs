use serde::Deserialize;

use crate::error::DbAccessError;
use crate::pool::DbPool;
use crate::pool::types::BackendPool;

/// Options for the `SQLite` pool.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Bounded pool size; acquisition blocks once this many connections are
    /// checked out.
    pub pool_max_size: usize,
    /// How many liveness-probe failures to absorb per acquisition before
    /// surfacing `ConnectionUnavailable`.
    pub probe_retries: u32,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            pool_max_size: 8,
            probe_retries: 3,
        }
    }

    #[must_use]
    pub fn with_pool_max_size(mut self, pool_max_size: usize) -> Self {
        self.pool_max_size = pool_max_size;
        self
    }

    #[must_use]
    pub fn with_probe_retries(mut self, probe_retries: u32) -> Self {
        self.probe_retries = probe_retries;
        self
    }

    /// Load options from the `DB_PATH` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::ConfigError`] when `DB_PATH` is missing.
    pub fn from_env() -> Result<Self, DbAccessError> {
        let db_path = std::env::var("DB_PATH").map_err(|_| {
            DbAccessError::ConfigError("missing environment variable DB_PATH".to_string())
        })?;
        Ok(Self::new(db_path))
    }
}

impl DbPool {
    /// Build the `SQLite` pool.
    ///
    /// Connections are opened lazily; a path that cannot be opened surfaces
    /// as `ConnectionUnavailable` on first acquisition rather than here.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::ConnectionUnavailable`] if pool creation
    /// fails.
    pub fn new_sqlite(opts: SqliteOptions) -> Result<Self, DbAccessError> {
        let mut cfg = deadpool_sqlite::Config::new(opts.db_path.clone());
        cfg.pool = Some(deadpool::managed::PoolConfig::new(opts.pool_max_size));

        let pool = cfg
            .create_pool(deadpool_sqlite::Runtime::Tokio1)
            .map_err(|e| {
                DbAccessError::ConnectionUnavailable(format!("failed to create SQLite pool: {e}"))
            })?;

        tracing::debug!(
            db_path = %opts.db_path,
            pool_max_size = opts.pool_max_size,
            "SQLite pool created"
        );

        Ok(DbPool {
            pool: BackendPool::Sqlite(pool),
            probe_retries: opts.probe_retries,
        })
    }
}
