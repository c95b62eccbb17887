//! Named-placeholder binding.
//!
//! Statements are authored with `:name` placeholders and a [`ParamSet`].
//! Before execution the text is scanned with a quote/comment-aware state
//! machine and each placeholder is resolved against the parameter set:
//! SQL Server statements are rewritten to positional `@PN` markers (bound in
//! order), `SQLite` statements keep the `:name` form and bind by name.
//! Values never appear in the statement text.

use crate::error::DbAccessError;
use crate::params::ParamSet;
use crate::types::RowValues;

/// Placeholder convention of the backend that will execute the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// SQL Server positional markers like `@P1`.
    Mssql,
    /// `SQLite` named parameters like `:name`.
    Sqlite,
}

/// A statement ready for execution: backend-shaped SQL text plus the bound
/// values in first-occurrence order. Repeated placeholders share one entry.
#[derive(Debug, Clone)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<(String, RowValues)>,
}

enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Bracketed,
    LineComment,
    BlockComment(u32),
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn scan_ident(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && is_ident_continue(bytes[idx]) {
        idx += 1;
    }
    idx
}

/// Resolve every `:name` placeholder in `sql` against `params`.
///
/// Placeholders inside single/double quotes, `[bracketed]` identifiers, `--`
/// line comments, and (nested) `/* */` block comments are left untouched.
/// Parameter-set keys with no matching placeholder are ignored.
///
/// # Errors
///
/// Returns [`DbAccessError::StatementFailed`] when a placeholder has no
/// value in the parameter set.
pub fn bind_named(
    sql: &str,
    params: &ParamSet,
    style: PlaceholderStyle,
) -> Result<BoundStatement, DbAccessError> {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut bound: Vec<(String, RowValues)> = Vec::new();
    let mut state = State::Normal;
    // Start of the region not yet copied into `out`.
    let mut copied = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        match state {
            State::Normal => match bytes[idx] {
                b'\'' => {
                    state = State::SingleQuoted;
                    idx += 1;
                }
                b'"' => {
                    state = State::DoubleQuoted;
                    idx += 1;
                }
                b'[' => {
                    state = State::Bracketed;
                    idx += 1;
                }
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 2;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 2;
                }
                b':' if bytes.get(idx + 1).is_some_and(|&b| is_ident_start(b)) => {
                    let end = scan_ident(bytes, idx + 1);
                    let name = &sql[idx + 1..end];
                    let value = params.get(name).ok_or_else(|| {
                        DbAccessError::StatementFailed(format!(
                            "no value bound for parameter :{name}"
                        ))
                    })?;
                    let ordinal = match bound.iter().position(|(n, _)| n == name) {
                        Some(existing) => existing,
                        None => {
                            bound.push((name.to_string(), value.clone()));
                            bound.len() - 1
                        }
                    };
                    out.push_str(&sql[copied..idx]);
                    match style {
                        PlaceholderStyle::Mssql => {
                            out.push_str("@P");
                            out.push_str(&(ordinal + 1).to_string());
                        }
                        PlaceholderStyle::Sqlite => out.push_str(&sql[idx..end]),
                    }
                    copied = end;
                    idx = end;
                }
                _ => idx += 1,
            },
            State::SingleQuoted => {
                if bytes[idx] == b'\'' {
                    state = State::Normal;
                }
                idx += 1;
            }
            State::DoubleQuoted => {
                if bytes[idx] == b'"' {
                    state = State::Normal;
                }
                idx += 1;
            }
            State::Bracketed => {
                if bytes[idx] == b']' {
                    state = State::Normal;
                }
                idx += 1;
            }
            State::LineComment => {
                if bytes[idx] == b'\n' {
                    state = State::Normal;
                }
                idx += 1;
            }
            State::BlockComment(depth) => {
                if bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 2;
                } else if bytes[idx] == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 2;
                } else {
                    idx += 1;
                }
            }
        }
    }

    out.push_str(&sql[copied..]);
    Ok(BoundStatement {
        sql: out,
        params: bound,
    })
}
