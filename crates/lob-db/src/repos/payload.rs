//! Payload row repository for the growth monitor.

use lob_core::entities::PayloadRow;

use crate::error::DatabaseError;
use crate::pool::PooledConnection;

impl PooledConnection<'_> {
    /// Insert a payload row with a NULL blob and return its id.
    pub async fn insert_empty_payload(&self) -> Result<i64, DatabaseError> {
        self.insert_returning_id(
            "payload",
            "INSERT INTO payload (data) VALUES (NULL) RETURNING id",
            (),
        )
        .await
    }

    /// Replace the whole blob of row `id`. Returns the number of updated rows.
    pub async fn update_payload(&self, id: i64, data: &[u8]) -> Result<u64, DatabaseError> {
        self.execute(
            "UPDATE payload SET data = ?1 WHERE id = ?2",
            libsql::params![libsql::Value::Blob(data.to_vec()), id],
        )
        .await
    }

    pub async fn get_payload(&self, id: i64) -> Result<Option<PayloadRow>, DatabaseError> {
        let sql = "SELECT id, data FROM payload WHERE id = ?1";
        let q = |e| DatabaseError::query(sql, e);
        let mut rows = self.query(sql, [id]).await?;
        let Some(row) = rows.next().await.map_err(q)? else {
            return Ok(None);
        };
        let data = match row.get_value(1).map_err(q)? {
            libsql::Value::Blob(bytes) => Some(bytes),
            _ => None,
        };
        Ok(Some(PayloadRow {
            id: row.get::<i64>(0).map_err(q)?,
            data,
        }))
    }
}
