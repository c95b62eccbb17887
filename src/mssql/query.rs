use chrono::NaiveDateTime;
use futures_util::TryStreamExt;
use tiberius::Query;

use super::MssqlClient;
use crate::binding::BoundStatement;
use crate::error::DbAccessError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Attach a bound statement's values to a tiberius query in ordinal order,
/// matching the `@PN` markers produced by the binder.
fn bind(stmt: &BoundStatement) -> Query<'_> {
    let mut query = Query::new(stmt.sql.as_str());
    for (_, value) in &stmt.params {
        match value {
            RowValues::Int(i) => query.bind(*i),
            RowValues::Float(f) => query.bind(*f),
            RowValues::Text(s) => query.bind(s.clone()),
            RowValues::Bool(b) => query.bind(*b),
            RowValues::Timestamp(dt) => query.bind(*dt),
            RowValues::Null => query.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query.bind(jsval.to_string()),
            RowValues::Blob(bytes) => query.bind(bytes.clone()),
        }
    }
    query
}

/// Execute statement text with no parameters and no result rows.
pub(crate) async fn execute_batch(
    client: &mut MssqlClient,
    sql: &str,
) -> Result<(), DbAccessError> {
    Query::new(sql)
        .execute(client)
        .await
        .map_err(|e| DbAccessError::StatementFailed(format!("SQL Server batch error: {e}")))?;
    Ok(())
}

/// Execute a bound read statement (or result-returning procedure call) and
/// collect its rows.
pub(crate) async fn query(
    client: &mut MssqlClient,
    stmt: &BoundStatement,
) -> Result<ResultSet, DbAccessError> {
    let query = bind(stmt);

    let mut stream = query
        .query(client)
        .await
        .map_err(|e| DbAccessError::StatementFailed(format!("SQL Server query error: {e}")))?;

    let columns_opt = stream.columns().await.map_err(|e| {
        DbAccessError::StatementFailed(format!("SQL Server column fetch error: {e}"))
    })?;

    // A statement that produces no result set at all still yields an empty
    // sequence, never an error.
    let Some(columns) = columns_opt else {
        return Ok(ResultSet::default());
    };
    let column_names: Vec<String> = columns.iter().map(|col| col.name().to_string()).collect();

    let mut result_set = ResultSet::with_capacity(16);
    result_set.set_column_names(column_names);
    let col_count = result_set.column_count();

    let mut rows = stream.into_row_stream();
    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| DbAccessError::StatementFailed(format!("SQL Server row fetch error: {e}")))?
    {
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(&row, idx));
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Execute a bound statement for its side effect; returns rows affected.
pub(crate) async fn execute(
    client: &mut MssqlClient,
    stmt: &BoundStatement,
) -> Result<usize, DbAccessError> {
    let query = bind(stmt);

    let exec_result = query
        .execute(client)
        .await
        .map_err(|e| DbAccessError::StatementFailed(format!("SQL Server execution error: {e}")))?;

    let rows_affected: u64 = exec_result.rows_affected().iter().sum();
    usize::try_from(rows_affected).map_err(|e| {
        DbAccessError::StatementFailed(format!("invalid rows affected count: {e}"))
    })
}

/// Pull one value out of a tiberius row, trying the common column types in
/// turn; anything unrecognized surfaces as NULL rather than an error.
fn extract_value(row: &tiberius::Row, idx: usize) -> RowValues {
    if let Ok(Some(val)) = row.try_get::<i32, _>(idx) {
        return RowValues::Int(i64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<i64, _>(idx) {
        return RowValues::Int(val);
    }
    if let Ok(Some(val)) = row.try_get::<f32, _>(idx) {
        return RowValues::Float(f64::from(val));
    }
    if let Ok(Some(val)) = row.try_get::<f64, _>(idx) {
        return RowValues::Float(val);
    }
    if let Ok(Some(val)) = row.try_get::<bool, _>(idx) {
        return RowValues::Bool(val);
    }
    if let Ok(Some(val)) = row.try_get::<NaiveDateTime, _>(idx) {
        return RowValues::Timestamp(val);
    }
    if let Ok(Some(val)) = row.try_get::<&str, _>(idx) {
        return RowValues::Text(val.to_string());
    }
    if let Ok(Some(val)) = row.try_get::<&[u8], _>(idx) {
        return RowValues::Blob(val.to_vec());
    }
    RowValues::Null
}
