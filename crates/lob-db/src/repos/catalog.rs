//! Catalog lookups for the reopen probe.
//!
//! Names are compared exactly as the catalog stores them. `main` is the
//! schema of the primary database file.

use lob_core::responses::CatalogProbe;

use crate::error::DatabaseError;
use crate::pool::PooledConnection;

impl PooledConnection<'_> {
    /// Count tables named `table` in `schema`.
    pub async fn count_tables(&self, schema: &str, table: &str) -> Result<CatalogProbe, DatabaseError> {
        let count = self
            .query_scalar_i64(
                "SELECT COUNT(1) FROM pragma_table_list WHERE schema = ?1 AND name = ?2",
                [schema, table],
            )
            .await?
            .unwrap_or(0);
        Ok(CatalogProbe {
            schema: schema.to_string(),
            table: table.to_string(),
            count,
        })
    }

    /// User tables of `schema`, sorted by name.
    pub async fn list_tables(&self, schema: &str) -> Result<Vec<String>, DatabaseError> {
        let sql = "SELECT name FROM pragma_table_list
                   WHERE schema = ?1 AND type = 'table' AND name NOT LIKE 'sqlite_%'
                   ORDER BY name";
        let q = |e| DatabaseError::query(sql, e);
        let mut rows = self.query(sql, [schema]).await?;
        let mut names = Vec::new();
        while let Some(row) = rows.next().await.map_err(q)? {
            names.push(row.get::<String>(0).map_err(q)?);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::TempDir;

    use crate::pool::{ConnectionPool, PoolOptions};
    use crate::url::DatabaseUrl;

    #[rstest]
    #[case("main", "dataPoints", 1)]
    #[case("main", "DATAPOINTS", 0)]
    #[case("PUBLIC", "DATAPOINTS", 0)]
    #[case("temp", "dataPoints", 0)]
    #[tokio::test]
    async fn lookup_is_exact(#[case] schema: &str, #[case] table: &str, #[case] expected: i64) {
        let dir = TempDir::new().unwrap();
        let url = DatabaseUrl::parse(&format!("file:{}/catalog.db", dir.path().display())).unwrap();
        let pool = ConnectionPool::open(url, PoolOptions::default()).await.unwrap();
        let conn = pool.acquire().await.unwrap();
        conn.bootstrap_relational().await.unwrap();

        let probe = conn.count_tables(schema, table).await.unwrap();
        assert_eq!(probe.count, expected);
        assert_eq!(probe.table, table);
    }
}
