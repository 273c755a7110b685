//! Source, point and tag repository.

use lob_config::SeedConfig;
use lob_core::entities::{Point, Source, Tag};
use lob_core::responses::SeedReport;

use crate::error::DatabaseError;
use crate::pool::{ConnectionPool, PooledConnection};

fn row_to_point(row: &libsql::Row) -> Result<Point, libsql::Error> {
    Ok(Point {
        id: row.get::<i64>(0)?,
        source_id: row.get::<i64>(1)?,
        value: row.get::<i64>(2)?,
    })
}

fn row_to_tag(row: &libsql::Row) -> Result<Tag, libsql::Error> {
    Ok(Tag {
        point_id: row.get::<i64>(0)?,
        key: row.get::<String>(1)?,
        value: row.get::<String>(2)?,
    })
}

impl PooledConnection<'_> {
    /// Insert into `table` and return the generated id.
    pub(crate) async fn insert_returning_id(
        &self,
        table: &str,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<i64, DatabaseError> {
        self.query_scalar_i64(sql, params)
            .await?
            .ok_or_else(|| DatabaseError::GeneratedKey {
                table: table.to_string(),
            })
    }

    pub async fn insert_source(&self, value: i64) -> Result<Source, DatabaseError> {
        let id = self
            .insert_returning_id(
                "dataSources",
                "INSERT INTO dataSources (value) VALUES (?1) RETURNING id",
                [value],
            )
            .await?;
        Ok(Source { id, value })
    }

    pub async fn insert_point(&self, source_id: i64, value: i64) -> Result<Point, DatabaseError> {
        let id = self
            .insert_returning_id(
                "dataPoints",
                "INSERT INTO dataPoints (dataSourceId, value) VALUES (?1, ?2) RETURNING id",
                [source_id, value],
            )
            .await?;
        Ok(Point {
            id,
            source_id,
            value,
        })
    }

    pub async fn insert_tag(&self, point_id: i64, key: &str, value: &str) -> Result<Tag, DatabaseError> {
        self.execute(
            "INSERT INTO dataPointTags (dataPointId, tagKey, tagValue) VALUES (?1, ?2, ?3)",
            libsql::params![point_id, key, value],
        )
        .await?;
        Ok(Tag {
            point_id,
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub async fn get_point(&self, id: i64) -> Result<Option<Point>, DatabaseError> {
        let sql = "SELECT id, dataSourceId, value FROM dataPoints WHERE id = ?1";
        let mut rows = self.query(sql, [id]).await?;
        match rows.next().await.map_err(|e| DatabaseError::query(sql, e))? {
            Some(row) => Ok(Some(row_to_point(&row).map_err(|e| DatabaseError::query(sql, e))?)),
            None => Ok(None),
        }
    }

    /// Tags of a point, ordered by key.
    pub async fn tags_for_point(&self, point_id: i64) -> Result<Vec<Tag>, DatabaseError> {
        let sql = "SELECT dataPointId, tagKey, tagValue FROM dataPointTags
                   WHERE dataPointId = ?1 ORDER BY tagKey";
        let q = |e| DatabaseError::query(sql, e);
        let mut rows = self.query(sql, [point_id]).await?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next().await.map_err(q)? {
            tags.push(row_to_tag(&row).map_err(q)?);
        }
        Ok(tags)
    }

    pub async fn count_tags(&self, point_id: i64) -> Result<i64, DatabaseError> {
        Ok(self
            .query_scalar_i64(
                "SELECT COUNT(1) FROM dataPointTags WHERE dataPointId = ?1",
                [point_id],
            )
            .await?
            .unwrap_or(0))
    }

    /// Delete a point; its tags go with it. Returns whether a row was removed.
    pub async fn delete_point(&self, id: i64) -> Result<bool, DatabaseError> {
        let affected = self
            .execute("DELETE FROM dataPoints WHERE id = ?1", [id])
            .await?;
        Ok(affected > 0)
    }
}

/// Write the Source → Point → Tag chain, one scoped connection per insert,
/// and read the point's tags back.
///
/// # Errors
///
/// Propagates the first failing insert or read.
pub async fn seed_chain(pool: &ConnectionPool, config: &SeedConfig) -> Result<SeedReport, DatabaseError> {
    let source = pool.acquire().await?.insert_source(config.source_value).await?;
    let point = pool
        .acquire()
        .await?
        .insert_point(source.id, config.point_value)
        .await?;
    pool.acquire()
        .await?
        .insert_tag(point.id, &config.tag_key, &config.tag_value)
        .await?;
    let tags = pool.acquire().await?.tags_for_point(point.id).await?;

    tracing::info!(source = source.id, point = point.id, tags = tags.len(), "seed chain written");
    Ok(SeedReport { source, point, tags })
}
