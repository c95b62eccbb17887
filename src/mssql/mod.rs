// SQL Server backend - pool construction and statement execution via tiberius
//
// - config: connection options and pool setup
// - query: parameter binding, result extraction, execution

pub mod config;
pub(crate) mod query;

pub use config::MssqlOptions;

/// Type alias for the pooled SQL Server client.
pub type MssqlClient = <deadpool_tiberius::Manager as deadpool::managed::Manager>::Type;
