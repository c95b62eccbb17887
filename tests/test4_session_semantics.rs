#![cfg(feature = "sqlite")]

use std::time::Duration;

use tokio::runtime::Runtime;

use viewproc::prelude::*;

fn open_db(dir: &tempfile::TempDir, pool_max_size: usize) -> DataAccess {
    let path = dir.path().join("sessions.db");
    let opts = SqliteOptions::new(path.to_string_lossy().into_owned())
        .with_pool_max_size(pool_max_size);
    let pool = DbPool::new_sqlite(opts).unwrap();
    DataAccess::new(pool)
}

async fn run_ddl(db: &DataAccess, sql: &str) {
    let sql = sql.to_string();
    db.with_session(move |session| {
        Box::pin(async move { session.execute(&sql, &ParamSet::new()).await.map(|_| ()) })
    })
    .await
    .unwrap();
}

async fn count_rows(db: &DataAccess, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) AS cnt FROM {table}");
    let row = db.query_one(&sql, &ParamSet::new()).await.unwrap().unwrap();
    *row.get("cnt").and_then(RowValues::as_int).unwrap()
}

#[test]
fn successful_unit_of_work_commits() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        let db = open_db(&dir, 4);
        run_ddl(&db, "CREATE TABLE audit_log (id INTEGER PRIMARY KEY, note TEXT)").await;

        let inserted: usize = db
            .with_session(move |session| {
                Box::pin(async move {
                    let mut total = 0;
                    for (id, note) in [(1, "first"), (2, "second")] {
                        let params = ParamSet::new().set("id", id).set("note", note);
                        total += session
                            .execute(
                                "INSERT INTO audit_log (id, note) VALUES (:id, :note)",
                                &params,
                            )
                            .await?;
                    }
                    Ok(total)
                })
            })
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(count_rows(&db, "audit_log").await, 2);
    });
}

#[test]
fn failed_unit_of_work_rolls_back_completely() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        let db = open_db(&dir, 4);
        run_ddl(&db, "CREATE TABLE audit_log (id INTEGER PRIMARY KEY, note TEXT)").await;

        let result: Result<(), DbAccessError> = db
            .with_session(move |session| {
                Box::pin(async move {
                    let params = ParamSet::new().set("id", 1).set("note", "kept?");
                    session
                        .execute(
                            "INSERT INTO audit_log (id, note) VALUES (:id, :note)",
                            &params,
                        )
                        .await?;
                    // Second statement fails; the first must not survive.
                    session
                        .execute("INSERT INTO no_such_table (id) VALUES (:id)", &params)
                        .await?;
                    Ok(())
                })
            })
            .await;

        assert!(matches!(result, Err(DbAccessError::StatementFailed(_))));
        assert_eq!(count_rows(&db, "audit_log").await, 0);
    });
}

#[test]
fn backend_diagnostics_survive_the_rollback_path() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        let db = open_db(&dir, 4);
        run_ddl(&db, "CREATE TABLE audit_log (id INTEGER PRIMARY KEY, note TEXT)").await;

        let params = ParamSet::new().set("id", 1).set("note", "original");
        db.with_session({
            let params = params.clone();
            move |session| {
                Box::pin(async move {
                    session
                        .execute(
                            "INSERT INTO audit_log (id, note) VALUES (:id, :note)",
                            &params,
                        )
                        .await
                        .map(|_| ())
                })
            }
        })
        .await
        .unwrap();

        // Duplicate primary key: the constraint name must reach the caller.
        let result: Result<(), DbAccessError> = db
            .with_session(move |session| {
                Box::pin(async move {
                    session
                        .execute(
                            "INSERT INTO audit_log (id, note) VALUES (:id, :note)",
                            &params,
                        )
                        .await
                        .map(|_| ())
                })
            })
            .await;

        match result {
            Err(DbAccessError::StatementFailed(msg)) => {
                assert!(msg.contains("UNIQUE"), "diagnostic was lost: {msg}");
            }
            other => panic!("expected StatementFailed, got {other:?}"),
        }
    });
}

#[test]
fn commit_failure_aborts_and_still_releases_the_connection() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        // A single-connection pool makes a leaked connection observable.
        let db = open_db(&dir, 1);
        run_ddl(&db, "CREATE TABLE audit_log (id INTEGER PRIMARY KEY, note TEXT)").await;

        // The unit of work ends the transaction itself, so the session's own
        // commit finds no transaction left to commit.
        let result: Result<(), DbAccessError> = db
            .with_session(move |session| {
                Box::pin(async move {
                    let params = ParamSet::new().set("id", 1).set("note", "early");
                    session
                        .execute(
                            "INSERT INTO audit_log (id, note) VALUES (:id, :note)",
                            &params,
                        )
                        .await?;
                    session.execute("COMMIT", &ParamSet::new()).await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Err(DbAccessError::TransactionAborted(msg)) => {
                assert!(msg.contains("commit failed"), "unexpected message: {msg}");
            }
            other => panic!("expected TransactionAborted, got {other:?}"),
        }

        let follow_up = tokio::time::timeout(
            Duration::from_secs(5),
            db.query_many("SELECT * FROM audit_log", &ParamSet::new()),
        )
        .await
        .expect("pool exhausted: connection was not released");
        // The premature commit already made the insert durable.
        assert_eq!(follow_up.unwrap().len(), 1);
    });
}

#[test]
fn connection_is_released_after_a_failed_session() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        // A single-connection pool: a leaked connection would deadlock the
        // follow-up query.
        let db = open_db(&dir, 1);
        run_ddl(&db, "CREATE TABLE audit_log (id INTEGER PRIMARY KEY, note TEXT)").await;

        let result: Result<(), DbAccessError> = db
            .with_session(move |session| {
                Box::pin(async move {
                    session
                        .execute("SELECT * FROM no_such_table", &ParamSet::new())
                        .await
                        .map(|_| ())
                })
            })
            .await;
        assert!(result.is_err());

        let follow_up = tokio::time::timeout(
            Duration::from_secs(5),
            db.query_many("SELECT * FROM audit_log", &ParamSet::new()),
        )
        .await
        .expect("pool exhausted: connection was not released");
        assert!(follow_up.unwrap().is_empty());
    });
}

#[test]
fn missing_placeholder_value_fails_before_reaching_the_backend() {
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let dir = tempfile::TempDir::new().unwrap();
        let db = open_db(&dir, 4);
        run_ddl(&db, "CREATE TABLE audit_log (id INTEGER PRIMARY KEY, note TEXT)").await;

        let err = db
            .query_many(
                "SELECT * FROM audit_log WHERE id = :id",
                &ParamSet::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbAccessError::StatementFailed(_)));
        assert!(err.to_string().contains(":id"));
        // The pool stays usable afterwards.
        assert!(db.health_check().await);
    });
}
