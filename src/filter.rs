//! Dynamic filter building for ad-hoc view queries.
//!
//! A [`FilterSpec`] carries requested field values straight from the routing
//! layer. Entries whose value is NULL or empty-string mean "no constraint"
//! and are dropped; the rest become parameterized equality predicates.
//!
//! Trust boundary: field names (and the view name passed to
//! [`select_statement`]) are identifiers already validated against a known
//! schema by the calling layer. Identifiers cannot be parameter-bound, so
//! they are spliced into the statement text; values never are. Never feed
//! raw end-user text into field or view names. Duplicate fields differing
//! only in case are passed through unchanged and resolve under backend
//! collation rules; normalize before calling.

use crate::params::ParamSet;
use crate::types::RowValues;

/// Requested filter values for one view query, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    fields: Vec<(String, RowValues)>,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field entry.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RowValues>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

/// A generated conditional clause plus the parameters it binds.
///
/// `clause` is either empty (no constraints survived) or
/// `WHERE a = :a AND b = :b ...`.
#[derive(Debug, Clone)]
pub struct FilterClause {
    pub clause: String,
    pub params: ParamSet,
}

/// NULL and empty-string are the "no constraint" sentinels; they are never
/// coerced into a match against NULL or ''.
fn is_absent(value: &RowValues) -> bool {
    match value {
        RowValues::Null => true,
        RowValues::Text(s) => s.is_empty(),
        _ => false,
    }
}

/// Turn a filter specification into a parameterized `WHERE` clause.
///
/// Each present entry yields exactly one `field = :field` predicate; the
/// predicates are joined with `AND`. Zero present entries yield an empty
/// clause, selecting all rows.
#[must_use]
pub fn build_filter_clause(spec: &FilterSpec) -> FilterClause {
    let mut predicates = Vec::new();
    let mut params = ParamSet::new();
    for (name, value) in spec.iter() {
        if is_absent(value) {
            continue;
        }
        predicates.push(format!("{name} = :{name}"));
        params.insert(name, value.clone());
    }
    let clause = if predicates.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", predicates.join(" AND "))
    };
    FilterClause { clause, params }
}

/// Compose a `SELECT *` over a trusted view name and a built filter clause.
#[must_use]
pub fn select_statement(view: &str, filter: &FilterClause) -> String {
    if filter.clause.is_empty() {
        format!("SELECT * FROM {view}")
    } else {
        format!("SELECT * FROM {view} {}", filter.clause)
    }
}
