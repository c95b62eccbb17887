use serde::Deserialize;

use crate::error::DbAccessError;
use crate::pool::DbPool;
use crate::pool::types::BackendPool;

/// Options for the SQL Server pool, assembled once at process start.
///
/// There is deliberately no ambient configuration: everything query logic
/// needs travels inside the pool handle built from these options.
#[derive(Debug, Clone, Deserialize)]
pub struct MssqlOptions {
    pub server: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: Option<u16>,
    /// Bounded pool size; acquisition blocks once this many connections are
    /// checked out.
    pub pool_max_size: usize,
    /// How many liveness-probe failures to absorb per acquisition before
    /// surfacing `ConnectionUnavailable`.
    pub probe_retries: u32,
}

impl MssqlOptions {
    #[must_use]
    pub fn new(
        server: impl Into<String>,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            database: database.into(),
            user: user.into(),
            password: password.into(),
            port: None,
            pool_max_size: 20,
            probe_retries: 3,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
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

    /// Load options from the `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`,
    /// and `DB_PASSWORD` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::ConfigError`] when a required variable is
    /// missing or `DB_PORT` is not a valid port number.
    pub fn from_env() -> Result<Self, DbAccessError> {
        let mut opts = Self::new(
            require_env("DB_HOST")?,
            require_env("DB_NAME")?,
            require_env("DB_USER")?,
            require_env("DB_PASSWORD")?,
        );
        if let Ok(port) = std::env::var("DB_PORT") {
            let port = port.parse::<u16>().map_err(|e| {
                DbAccessError::ConfigError(format!("invalid DB_PORT value {port:?}: {e}"))
            })?;
            opts.port = Some(port);
        }
        Ok(opts)
    }
}

fn require_env(name: &str) -> Result<String, DbAccessError> {
    std::env::var(name)
        .map_err(|_| DbAccessError::ConfigError(format!("missing environment variable {name}")))
}

impl DbPool {
    /// Build the SQL Server pool.
    ///
    /// Connections are opened lazily; liveness is verified on acquisition.
    ///
    /// # Errors
    ///
    /// Returns [`DbAccessError::ConnectionUnavailable`] if pool creation
    /// fails.
    pub fn new_mssql(opts: MssqlOptions) -> Result<Self, DbAccessError> {
        let pool = deadpool_tiberius::Manager::new()
            .host(&opts.server)
            .port(opts.port.unwrap_or(1433))
            .database(&opts.database)
            .basic_authentication(&opts.user, &opts.password)
            .trust_cert()
            .max_size(opts.pool_max_size)
            .create_pool()
            .map_err(|e| {
                DbAccessError::ConnectionUnavailable(format!(
                    "failed to create SQL Server pool: {e}"
                ))
            })?;

        tracing::debug!(
            server = %opts.server,
            database = %opts.database,
            pool_max_size = opts.pool_max_size,
            "SQL Server pool created"
        );

        Ok(DbPool {
            pool: BackendPool::Mssql(pool),
            probe_retries: opts.probe_retries,
        })
    }
}
