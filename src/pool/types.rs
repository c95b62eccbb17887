#[cfg(feature = "sqlite")]
use deadpool_sqlite::Pool as DeadpoolSqlitePool;

#[cfg(feature = "mssql")]
use deadpool_tiberius::Pool as TiberiusPool;

use crate::types::BackendKind;

/// The backend-specific connection pool.
#[derive(Clone)]
pub enum BackendPool {
    /// SQL Server connection pool
    #[cfg(feature = "mssql")]
    Mssql(TiberiusPool),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(DeadpoolSqlitePool),
}

// Manual Debug implementation because deadpool_tiberius::Manager doesn't implement Debug
impl std::fmt::Debug for BackendPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => f.debug_tuple("Mssql").field(&"<TiberiusPool>").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => f.debug_tuple("Sqlite").field(pool).finish(),
        }
    }
}

impl BackendPool {
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => BackendKind::Mssql,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => BackendKind::Sqlite,
        }
    }
}
