//! Connection provider: one bounded pool per backend, built once at startup
//! from explicit options and shared by clone. Acquisition goes through
//! [`DbPool::acquire`], which liveness-probes previously used connections
//! before handing them out; release is RAII (dropping a checked-out
//! connection returns it to the pool).

pub mod connection;
pub mod types;

pub use connection::PooledConnection;
pub use types::BackendPool;

use crate::types::BackendKind;

/// A handle to the connection pool plus the immutable acquisition policy
/// decided at process start. Cheap to clone; all clones share the pool.
#[derive(Debug, Clone)]
pub struct DbPool {
    pub(crate) pool: BackendPool,
    pub(crate) probe_retries: u32,
}

impl DbPool {
    /// Which backend this pool talks to.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        self.pool.kind()
    }
}
