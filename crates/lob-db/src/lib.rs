//! # lob-db
//!
//! libSQL engine client for lobprobe.
//!
//! Owns everything that talks to the engine: the connection URL, a small
//! connection pool whose guards release on drop, the embedded schema, the
//! seed and payload repositories, and the two probes (reopen compatibility
//! and LOB growth).
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) in local mode only.

pub mod error;
pub mod pool;
pub mod probes;
pub mod repos;
pub mod schema;
pub mod url;

pub use error::DatabaseError;
pub use pool::{ConnectionPool, PoolOptions, PooledConnection};
pub use probes::{Generated, GrowthMonitor, ReopenProbe, generate};
pub use url::DatabaseUrl;
