#![cfg(feature = "sqlite")]

use tokio::runtime::Runtime;

use viewproc::prelude::*;

#[test]
fn healthy_backend_reports_true() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("health.db");
        let pool = DbPool::new_sqlite(SqliteOptions::new(path.to_string_lossy().into_owned()))
            .unwrap();
        let db = DataAccess::new(pool);

        assert!(db.health_check().await);
        assert_eq!(db.pool().kind(), BackendKind::Sqlite);
    });
}

#[test]
fn unreachable_backend_reports_false_without_raising() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        // Parent directory does not exist, so the lazily opened connection
        // cannot be established.
        let opts = SqliteOptions::new("/viewproc-no-such-dir/health.db").with_probe_retries(1);
        let pool = DbPool::new_sqlite(opts).unwrap();
        let db = DataAccess::new(pool);

        assert!(!db.health_check().await);
        // Still false on a second attempt; never an error, never a panic.
        assert!(!db.health_check().await);
    });
}

#[test]
fn sqlite_options_load_from_the_environment() {
    // Environment mutation is process-global, so assert against whatever
    // state the test process inherited instead of changing it.
    match std::env::var("DB_PATH") {
        Ok(path) => {
            let opts = SqliteOptions::from_env().unwrap();
            assert_eq!(opts.db_path, path);
        }
        Err(_) => {
            let err = SqliteOptions::from_env().unwrap_err();
            assert!(matches!(err, DbAccessError::ConfigError(_)));
            assert!(err.to_string().contains("DB_PATH"));
        }
    }
}

#[test]
fn acquisition_failure_surfaces_as_connection_unavailable() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let opts = SqliteOptions::new("/viewproc-no-such-dir/health.db").with_probe_retries(1);
        let pool = DbPool::new_sqlite(opts).unwrap();
        let db = DataAccess::new(pool);

        let err = db
            .query_many("SELECT 1 AS one", &ParamSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DbAccessError::ConnectionUnavailable(_)));
    });
}
