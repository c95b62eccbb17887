// SQLite backend - used for local development and integration tests
//
// - config: pool options and setup
// - query: named-parameter binding, result extraction, execution

pub mod config;
pub(crate) mod query;

pub use config::SqliteOptions;
