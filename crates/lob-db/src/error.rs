//! Database error types for lob-db.

use std::path::PathBuf;

use lob_core::errors::CoreError;
use lob_core::responses::CatalogProbe;
use thiserror::Error;

/// Errors from engine access and the probes built on it.
///
/// Nothing here is retried or recovered: every variant aborts the running
/// scenario and carries enough context to reproduce the failing step.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection URL could not be parsed.
    #[error("Invalid connection URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The engine refused to open the database or hand out a connection.
    #[error("Failed to connect to {url}: {source}")]
    Connection {
        url: String,
        #[source]
        source: libsql::Error,
    },

    /// Every allowed connection is already acquired.
    #[error("Connection limit of {max} reached for {url}")]
    PoolExhausted { url: String, max: u32 },

    /// A DDL statement was rejected.
    #[error("Schema statement '{statement}' rejected: {source}")]
    Schema {
        statement: String,
        #[source]
        source: libsql::Error,
    },

    /// An insert did not yield the engine-generated key.
    #[error("Insert into {table} returned no generated key")]
    GeneratedKey { table: String },

    /// A read or write statement failed.
    #[error("Query failed: {sql}: {source}")]
    Query {
        sql: String,
        #[source]
        source: libsql::Error,
    },

    /// The two reopen probes disagree.
    #[error(
        "Reopen probes disagree for {}.{}: first open counted {}, second open counted {}",
        first.schema, first.table, first.count, second.count
    )]
    CompatibilityMismatch {
        first: CatalogProbe,
        second: CatalogProbe,
    },

    /// The engine did not create the database file where expected.
    #[error("Database file {} does not exist", .0.display())]
    MissingDatabaseFile(PathBuf),

    /// Invalid state encountered (e.g., connection not in auto-commit mode).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A growth monitor iteration failed.
    #[error("Growth iteration {iteration} failed: {source}")]
    AtIteration {
        iteration: u32,
        #[source]
        source: Box<DatabaseError>,
    },

    /// Filesystem or codec failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DatabaseError {
    pub(crate) fn query(sql: &str, source: libsql::Error) -> Self {
        Self::Query {
            sql: sql.to_string(),
            source,
        }
    }

    pub(crate) fn at_iteration(iteration: u32) -> impl FnOnce(Self) -> Self {
        move |source| Self::AtIteration {
            iteration,
            source: Box::new(source),
        }
    }
}
