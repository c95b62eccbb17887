//! Async data-access middleware exposing relational views and stored
//! procedures as safe, parameterized operations.
//!
//! The crate sits between a request-routing layer and the database: it owns
//! pooled connections (with liveness probing on reuse), scoped transactional
//! sessions (commit on success, rollback on failure, guaranteed release),
//! read queries returning weakly typed row mappings, named-parameter
//! stored-procedure invocation, and a dynamic filter builder for ad-hoc view
//! queries. SQL Server is the primary backend; `SQLite` backs local
//! development and the integration tests.
//!
//! ```rust,no_run
//! # #[cfg(feature = "mssql")] mod demo {
//! use viewproc::prelude::*;
//!
//! async fn run() -> Result<(), DbAccessError> {
//!     let pool = DbPool::new_mssql(MssqlOptions::from_env()?)?;
//!     let db = DataAccess::new(pool);
//!
//!     let params = ParamSet::new().set("RoleId", 3).set("TeamCode", "T01");
//!     let managers = db.call_with_result("dbo.HR_GetTeamManager", &params).await?;
//!
//!     let filters = FilterSpec::new().field("RoleID", 12).field("RequestType", "");
//!     let targets = db.select_from_view("V_HR_RoleTarget", &filters).await?;
//!     let _ = (managers, targets);
//!     Ok(())
//! }
//! # }
//! # fn main() {}
//! ```

#[cfg(not(any(feature = "mssql", feature = "sqlite")))]
compile_error!("viewproc requires at least one backend feature: `mssql` or `sqlite`");

pub mod access;
pub mod binding;
pub mod error;
pub mod filter;
pub mod params;
pub mod pool;
pub mod prelude;
pub mod procs;
pub mod results;
pub mod session;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use access::{DataAccess, ViewProcOps};
pub use error::DbAccessError;
