//! Schema bootstrap.
//!
//! The DDL is embedded at compile time and issued one statement at a time on
//! an auto-commit connection. There is no `IF NOT EXISTS`: bootstrapping a
//! database that already holds a table is an error, which is how the probes
//! notice they were pointed at a stale file.

use crate::error::DatabaseError;
use crate::pool::PooledConnection;

const DATA_SOURCES: &str = include_str!("../schema/001_data_sources.sql");
const DATA_POINTS: &str = include_str!("../schema/002_data_points.sql");
const DATA_POINT_TAGS: &str = include_str!("../schema/003_data_point_tags.sql");
const PAYLOAD: &str = include_str!("../schema/010_payload.sql");

/// Tables of the relational chain, in creation order.
pub const RELATIONAL_TABLES: [&str; 3] = ["dataSources", "dataPoints", "dataPointTags"];

pub const PAYLOAD_TABLE: &str = "payload";

impl PooledConnection<'_> {
    /// Create `dataSources`, `dataPoints` and `dataPointTags`, in that order.
    ///
    /// Returns the names of the created tables.
    ///
    /// # Errors
    ///
    /// `DatabaseError::InvalidState` if the connection is inside a transaction,
    /// `DatabaseError::Schema` naming the first statement the engine rejected.
    pub async fn bootstrap_relational(&self) -> Result<Vec<String>, DatabaseError> {
        self.require_autocommit()?;
        for statement in [DATA_SOURCES, DATA_POINTS, DATA_POINT_TAGS] {
            self.create(statement).await?;
        }
        tracing::info!(tables = ?RELATIONAL_TABLES, "relational schema created");
        Ok(RELATIONAL_TABLES.iter().map(ToString::to_string).collect())
    }

    /// Create the `payload` table used by the growth monitor.
    ///
    /// # Errors
    ///
    /// Same as [`bootstrap_relational`](Self::bootstrap_relational).
    pub async fn bootstrap_payload(&self) -> Result<Vec<String>, DatabaseError> {
        self.require_autocommit()?;
        self.create(PAYLOAD).await?;
        tracing::info!(table = PAYLOAD_TABLE, "payload schema created");
        Ok(vec![PAYLOAD_TABLE.to_string()])
    }

    fn require_autocommit(&self) -> Result<(), DatabaseError> {
        if self.is_autocommit() {
            Ok(())
        } else {
            Err(DatabaseError::InvalidState(
                "schema bootstrap needs an auto-commit connection".into(),
            ))
        }
    }

    async fn create(&self, statement: &str) -> Result<(), DatabaseError> {
        let statement = statement.trim();
        tracing::debug!(target: "lob_db::sql", sql = statement, "ddl");
        self.conn()
            .execute(statement, ())
            .await
            .map_err(|source| DatabaseError::Schema {
                statement: statement.to_string(),
                source,
            })?;
        Ok(())
    }
}
