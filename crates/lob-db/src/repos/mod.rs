//! Repositories over the harness tables.
//!
//! Each module adds methods to `PooledConnection` via `impl` blocks, so every
//! statement runs on a scoped acquisition.

pub mod catalog;
pub mod payload;
pub mod seed;

pub use seed::seed_chain;
