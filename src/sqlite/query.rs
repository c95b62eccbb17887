use deadpool_sqlite::Object as SqliteObject;
use deadpool_sqlite::rusqlite::{self, ToSql, types::Value};

use crate::binding::BoundStatement;
use crate::error::DbAccessError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Convert a middleware value into a `SQLite` value.
fn to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Owned named parameters, shaped for rusqlite's `:name` binding. The
/// interact closures run on a worker thread, so everything they touch is
/// moved in.
fn named_values(stmt: &BoundStatement) -> Vec<(String, Value)> {
    stmt.params
        .iter()
        .map(|(name, value)| (format!(":{name}"), to_sqlite_value(value)))
        .collect()
}

fn as_refs(named: &[(String, Value)]) -> Vec<(&str, &dyn ToSql)> {
    named
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, DbAccessError> {
    let value: Value = row.get(idx).map_err(DbAccessError::from)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Execute statement text with no parameters and no result rows.
pub(crate) async fn execute_batch(conn: &SqliteObject, sql: &str) -> Result<(), DbAccessError> {
    let sql = sql.to_string();
    conn.interact(move |raw| raw.execute_batch(&sql).map_err(DbAccessError::from))
        .await?
}

/// Run a bound read statement and collect its rows.
pub(crate) async fn query(
    conn: &SqliteObject,
    stmt: &BoundStatement,
) -> Result<ResultSet, DbAccessError> {
    let sql = stmt.sql.clone();
    let named = named_values(stmt);
    conn.interact(move |raw| query_sync(raw, &sql, &named)).await?
}

fn query_sync(
    conn: &mut rusqlite::Connection,
    sql: &str,
    named: &[(String, Value)],
) -> Result<ResultSet, DbAccessError> {
    let mut stmt = conn.prepare(sql).map_err(DbAccessError::from)?;
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();

    let mut result_set = ResultSet::with_capacity(16);
    result_set.set_column_names(column_names);
    let col_count = result_set.column_count();

    let refs = as_refs(named);
    let mut rows = stmt.query(refs.as_slice()).map_err(DbAccessError::from)?;
    while let Some(row) = rows.next().map_err(DbAccessError::from)? {
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

/// Run a bound statement for its side effect; returns rows affected.
pub(crate) async fn execute(
    conn: &SqliteObject,
    stmt: &BoundStatement,
) -> Result<usize, DbAccessError> {
    let sql = stmt.sql.clone();
    let named = named_values(stmt);
    conn.interact(move |raw| {
        let mut stmt = raw.prepare(&sql).map_err(DbAccessError::from)?;
        let refs = as_refs(&named);
        stmt.execute(refs.as_slice()).map_err(DbAccessError::from)
    })
    .await?
}
