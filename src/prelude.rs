//! Convenient imports for common functionality.

pub use crate::access::{DataAccess, ViewProcOps};
pub use crate::binding::{BoundStatement, PlaceholderStyle, bind_named};
pub use crate::error::DbAccessError;
pub use crate::filter::{FilterClause, FilterSpec, build_filter_clause, select_statement};
pub use crate::params::ParamSet;
pub use crate::pool::DbPool;
pub use crate::procs::build_call_statement;
pub use crate::results::{ResultSet, Row};
pub use crate::session::Session;
pub use crate::types::{BackendKind, RowValues};

#[cfg(feature = "mssql")]
pub use crate::mssql::MssqlOptions;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteOptions;
