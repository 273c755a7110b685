//! LOB growth monitor.
//!
//! Rewrites one blob over and over with a slowly changing Counter Map and
//! samples the database file size as it goes. The monitor judges nothing:
//! it hands every sample to the caller and returns the whole series.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::Utc;
use lob_config::GrowthConfig;
use lob_core::responses::{GrowthReport, SizeSample};
use lob_core::workload::CounterMap;
use lob_core::workspace::file_len;

use crate::error::DatabaseError;
use crate::pool::ConnectionPool;

/// Sample-to-first-sample ratio above which a warning is logged.
const SUSPICIOUS_GROWTH: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthMonitor {
    pub iterations: u32,
    pub sample_every: u32,
    pub counter_entries: u32,
}

impl GrowthMonitor {
    #[must_use]
    pub const fn new(config: &GrowthConfig) -> Self {
        Self {
            iterations: config.iterations,
            sample_every: config.sample_every,
            counter_entries: config.counter_entries,
        }
    }

    /// Run the write loop against `pool`, which must point at a database
    /// without a `payload` table.
    ///
    /// `observer` sees each sample as soon as it is taken.
    ///
    /// # Errors
    ///
    /// Bootstrap failures and `DatabaseError::MissingDatabaseFile` are
    /// returned as is; anything failing inside the loop is wrapped in
    /// `DatabaseError::AtIteration`.
    pub async fn run<F>(&self, pool: &ConnectionPool, mut observer: F) -> Result<GrowthReport, DatabaseError>
    where
        F: FnMut(&SizeSample),
    {
        if self.sample_every == 0 {
            return Err(DatabaseError::InvalidState("sample_every must be positive".into()));
        }
        let started_at = Utc::now();

        pool.acquire().await?.bootstrap_payload().await?;
        let row_id = pool.acquire().await?.insert_empty_payload().await?;
        let database = pool.database_file();
        if !database.is_file() {
            return Err(DatabaseError::MissingDatabaseFile(database.to_path_buf()));
        }

        tracing::info!(
            database = %database.display(),
            iterations = self.iterations,
            entries = self.counter_entries,
            "growth monitor started"
        );

        let mut counters = CounterMap::new(self.counter_entries);
        let mut samples: Vec<SizeSample> = Vec::new();
        let mut payload_bytes = 0;

        for i in 0..self.iterations {
            payload_bytes = write_iteration(pool, row_id, &mut counters)
                .await
                .map_err(DatabaseError::at_iteration(i))?;

            if i % self.sample_every == 0 {
                let bytes = on_disk_len(database)
                    .map_err(|e| DatabaseError::at_iteration(i)(e.into()))?;
                let sample = SizeSample::new(i, bytes);
                let first = samples.first().map_or(0, |s| s.bytes);
                if first > 0 && sample.bytes > first.saturating_mul(SUSPICIOUS_GROWTH) {
                    tracing::warn!(
                        iteration = i,
                        bytes = sample.bytes,
                        first,
                        "database file grew more than tenfold"
                    );
                }
                tracing::debug!(iteration = i, size = %sample.human, "size sampled");
                observer(&sample);
                samples.push(sample);
            }
        }

        let report = GrowthReport {
            database: database.display().to_string(),
            iterations: self.iterations,
            sample_every: self.sample_every,
            counter_entries: self.counter_entries,
            counter_value: counters.uniform_value().unwrap_or(0),
            payload_bytes,
            samples,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(samples = report.samples.len(), factor = ?report.growth_factor(), "growth monitor finished");
        Ok(report)
    }
}

/// Write-ahead log that sits next to `database` in WAL mode.
fn wal_path(database: &Path) -> PathBuf {
    let mut name = OsString::from(database.as_os_str());
    name.push("-wal");
    PathBuf::from(name)
}

/// Size of the database file plus its write-ahead log, if one exists.
/// Rewrites stay in the log until a checkpoint, so the main file alone
/// under-reports growth in WAL mode.
fn on_disk_len(database: &Path) -> Result<u64, lob_core::errors::CoreError> {
    let wal = wal_path(database);
    let wal_len = if wal.is_file() { file_len(&wal)? } else { 0 };
    Ok(file_len(database)? + wal_len)
}

/// Bump every counter and overwrite the blob on a fresh connection.
async fn write_iteration(
    pool: &ConnectionPool,
    row_id: i64,
    counters: &mut CounterMap,
) -> Result<usize, DatabaseError> {
    counters.increment_all();
    let blob = counters.encode()?;
    let updated = pool.acquire().await?.update_payload(row_id, &blob).await?;
    if updated != 1 {
        return Err(DatabaseError::InvalidState(format!(
            "payload row {row_id} updated {updated} rows"
        )));
    }
    Ok(blob.len())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::pool::PoolOptions;
    use crate::url::DatabaseUrl;

    async fn pool_in(dir: &TempDir) -> ConnectionPool {
        let url = DatabaseUrl::parse(&format!("file:{}/growth.db", dir.path().display())).unwrap();
        ConnectionPool::open(url, PoolOptions::default()).await.unwrap()
    }

    fn monitor(iterations: u32, sample_every: u32) -> GrowthMonitor {
        GrowthMonitor {
            iterations,
            sample_every,
            counter_entries: 100,
        }
    }

    #[tokio::test]
    async fn counters_track_iterations() {
        let dir = TempDir::new().unwrap();
        let pool = pool_in(&dir).await;

        let mut seen = Vec::new();
        let report = monitor(7, 3)
            .run(&pool, |s| seen.push(s.iteration))
            .await
            .unwrap();

        assert_eq!(seen, [0, 3, 6]);
        assert_eq!(report.counter_value, 7);
        assert!(report.payload_bytes > 0);
        assert_eq!(pool.active_connections(), 0);

        let stored = pool.acquire().await.unwrap().get_payload(1).await.unwrap().unwrap();
        let counters = CounterMap::decode(stored.data.as_deref().unwrap()).unwrap();
        assert_eq!(counters.len(), 100);
        assert_eq!(counters.get(99), Some(7));
    }

    #[test]
    fn sampled_size_includes_the_write_ahead_log() {
        let dir = TempDir::new().unwrap();
        let database = dir.path().join("sized.db");
        std::fs::write(&database, [0_u8; 10]).unwrap();
        assert_eq!(on_disk_len(&database).unwrap(), 10);

        std::fs::write(dir.path().join("sized.db-wal"), [0_u8; 5]).unwrap();
        assert_eq!(wal_path(&database), dir.path().join("sized.db-wal"));
        assert_eq!(on_disk_len(&database).unwrap(), 15);
    }

    #[tokio::test]
    async fn zero_iterations_take_no_samples() {
        let dir = TempDir::new().unwrap();
        let pool = pool_in(&dir).await;

        let report = monitor(0, 10).run(&pool, |_| {}).await.unwrap();
        assert!(report.samples.is_empty());
        assert_eq!(report.counter_value, 0);
    }

    #[tokio::test]
    async fn existing_payload_table_fails_bootstrap() {
        let dir = TempDir::new().unwrap();
        let pool = pool_in(&dir).await;
        pool.acquire().await.unwrap().bootstrap_payload().await.unwrap();

        let err = monitor(1, 1).run(&pool, |_| {}).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Schema { .. }));
    }

    #[tokio::test]
    async fn zero_sample_interval_is_rejected() {
        let dir = TempDir::new().unwrap();
        let pool = pool_in(&dir).await;

        let err = monitor(1, 0).run(&pool, |_| {}).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidState(_)));
    }

    #[tokio::test]
    async fn write_to_missing_row_is_reported_with_iteration() {
        let dir = TempDir::new().unwrap();
        let pool = pool_in(&dir).await;
        pool.acquire().await.unwrap().bootstrap_payload().await.unwrap();

        let mut counters = CounterMap::new(4);
        let err = write_iteration(&pool, 42, &mut counters)
            .await
            .map_err(DatabaseError::at_iteration(5))
            .unwrap_err();

        assert!(matches!(
            err,
            DatabaseError::AtIteration { iteration: 5, ref source }
                if matches!(**source, DatabaseError::InvalidState(_))
        ));
        assert!(err.to_string().starts_with("Growth iteration 5 failed"));
    }
}
