//! Connection pool with scoped connection guards.
//!
//! A [`ConnectionPool`] owns one libSQL database handle for one URL. Every
//! [`acquire`](ConnectionPool::acquire) opens a fresh connection, applies the
//! URL's engine flags and hands it out as a [`PooledConnection`]; dropping the
//! guard releases it. Guards borrow the pool, so [`dispose`](ConnectionPool::dispose)
//! cannot run while one is still alive.

use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use libsql::Builder;
use libsql::params::IntoParams;
use lob_core::workspace::ensure_parent_dir;

use crate::error::DatabaseError;
use crate::url::DatabaseUrl;

/// Options applied when opening a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Maximum number of simultaneously acquired connections.
    pub max_connections: u32,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self { max_connections: 8 }
    }
}

impl PoolOptions {
    #[must_use]
    pub const fn from_config(config: &lob_config::EngineConfig) -> Self {
        Self {
            max_connections: config.max_connections,
        }
    }
}

pub struct ConnectionPool {
    url: DatabaseUrl,
    options: PoolOptions,
    db: libsql::Database,
    active: AtomicU32,
    acquired: AtomicU64,
}

impl ConnectionPool {
    /// Open a pool against the database named by `url`.
    ///
    /// The database directory is created if needed; the engine creates the
    /// file itself on first write.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connection` if the engine refuses the path, or
    /// `DatabaseError::Core` if the directory cannot be created.
    pub async fn open(url: DatabaseUrl, options: PoolOptions) -> Result<Self, DatabaseError> {
        ensure_parent_dir(url.path())?;
        let db = Builder::new_local(url.path())
            .build()
            .await
            .map_err(|source| DatabaseError::Connection {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(%url, max_connections = options.max_connections, "pool opened");
        Ok(Self {
            url,
            options,
            db,
            active: AtomicU32::new(0),
            acquired: AtomicU64::new(0),
        })
    }

    /// Acquire a connection with foreign keys enabled and all URL flags applied.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::PoolExhausted` when `max_connections` guards are
    /// alive, `DatabaseError::Connection` if the engine refuses the connection
    /// or one of its flags.
    pub async fn acquire(&self) -> Result<PooledConnection<'_>, DatabaseError> {
        let max = self.options.max_connections;
        if self.active.load(Ordering::SeqCst) >= max {
            return Err(DatabaseError::PoolExhausted {
                url: self.url.to_string(),
                max,
            });
        }

        let conn = self.db.connect().map_err(|source| self.connection_error(source))?;
        self.active.fetch_add(1, Ordering::SeqCst);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        let guard = PooledConnection { pool: self, conn };

        // Foreign keys are per-connection in SQLite.
        guard
            .apply_pragma("PRAGMA foreign_keys = ON")
            .await
            .map_err(|source| self.connection_error(source))?;
        for pragma in self.url.pragmas() {
            guard
                .apply_pragma(&pragma)
                .await
                .map_err(|source| self.connection_error(source))?;
        }

        tracing::debug!(active = self.active_connections(), "connection acquired");
        Ok(guard)
    }

    /// Number of guards currently alive.
    #[must_use]
    pub fn active_connections(&self) -> u32 {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of connections handed out over the pool's lifetime.
    #[must_use]
    pub fn total_acquired(&self) -> u64 {
        self.acquired.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Path of the backing database file.
    #[must_use]
    pub fn database_file(&self) -> &Path {
        self.url.path()
    }

    /// Tear the pool down and close the database handle.
    ///
    /// Consumes the pool: nothing acquired from it can be used afterwards.
    pub fn dispose(self) {
        debug_assert_eq!(self.active_connections(), 0, "guards outlived their pool");
        tracing::debug!(
            url = %self.url,
            acquired = self.total_acquired(),
            "pool disposed"
        );
        drop(self.db);
    }

    fn connection_error(&self, source: libsql::Error) -> DatabaseError {
        DatabaseError::Connection {
            url: self.url.to_string(),
            source,
        }
    }
}

/// A connection acquired from a [`ConnectionPool`], released on drop.
///
/// Repository methods (`repos::*`) and the schema bootstrap are implemented on
/// this type, so every statement runs through a scoped acquisition.
pub struct PooledConnection<'pool> {
    pool: &'pool ConnectionPool,
    conn: libsql::Connection,
}

impl PooledConnection<'_> {
    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    #[must_use]
    pub fn is_autocommit(&self) -> bool {
        self.conn.is_autocommit()
    }

    /// Execute a statement, returning the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` carrying the SQL text.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        self.trace(sql);
        let affected = self
            .conn
            .execute(sql, params)
            .await
            .map_err(|source| DatabaseError::query(sql, source))?;
        if self.pool.url.trace_level() >= 2 {
            tracing::trace!(target: "lob_db::sql", affected, "statement finished");
        }
        Ok(affected)
    }

    /// Run a statement that returns rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` carrying the SQL text.
    pub async fn query(&self, sql: &str, params: impl IntoParams) -> Result<libsql::Rows, DatabaseError> {
        self.trace(sql);
        self.conn
            .query(sql, params)
            .await
            .map_err(|source| DatabaseError::query(sql, source))
    }

    /// Read column 0 of the first row as an integer, draining the rest.
    ///
    /// Returns `None` when the statement yields no rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Query` if the statement or the column read fails.
    pub async fn query_scalar_i64(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<Option<i64>, DatabaseError> {
        let q = |source| DatabaseError::query(sql, source);
        let mut rows = self.query(sql, params).await?;
        let value = match rows.next().await.map_err(q)? {
            Some(row) => Some(row.get::<i64>(0).map_err(q)?),
            None => None,
        };
        while rows.next().await.map_err(q)?.is_some() {}
        Ok(value)
    }

    /// Release the connection now. Dropping the guard does the same.
    pub fn close(self) {}

    async fn apply_pragma(&self, pragma: &str) -> Result<(), libsql::Error> {
        self.trace(pragma);
        // Some pragmas answer with a row (journal_mode); drain it.
        let mut rows = self.conn.query(pragma, ()).await?;
        while rows.next().await?.is_some() {}
        Ok(())
    }

    fn trace(&self, sql: &str) {
        if self.pool.url.trace_level() >= 1 {
            tracing::debug!(target: "lob_db::sql", sql, "statement");
        }
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        self.pool.active.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(active = self.pool.active_connections(), "connection released");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn url_in(dir: &TempDir) -> DatabaseUrl {
        DatabaseUrl::parse(&format!(
            "file:{}/databases/pool.db;JOURNAL_MODE=DELETE",
            dir.path().display()
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn guards_release_on_drop() {
        let dir = TempDir::new().unwrap();
        let pool = ConnectionPool::open(url_in(&dir), PoolOptions::default())
            .await
            .unwrap();

        {
            let a = pool.acquire().await.unwrap();
            let _b = pool.acquire().await.unwrap();
            assert_eq!(pool.active_connections(), 2);
            a.close();
            assert_eq!(pool.active_connections(), 1);
        }
        assert_eq!(pool.active_connections(), 0);
        assert_eq!(pool.total_acquired(), 2);
        pool.dispose();
    }

    #[tokio::test]
    async fn guard_released_on_error_path() {
        let dir = TempDir::new().unwrap();
        let pool = ConnectionPool::open(url_in(&dir), PoolOptions::default())
            .await
            .unwrap();

        async fn failing(pool: &ConnectionPool) -> Result<(), DatabaseError> {
            let conn = pool.acquire().await?;
            conn.execute("SELECT * FROM no_such_table", ()).await?;
            Ok(())
        }

        let err = failing(&pool).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query { ref sql, .. } if sql.contains("no_such_table")));
        assert_eq!(pool.active_connections(), 0);
        pool.dispose();
    }

    #[tokio::test]
    async fn exhausted_pool_refuses_acquire() {
        let dir = TempDir::new().unwrap();
        let pool = ConnectionPool::open(url_in(&dir), PoolOptions { max_connections: 1 })
            .await
            .unwrap();

        let held = pool.acquire().await.unwrap();
        let second = pool.acquire().await;
        assert!(matches!(second, Err(DatabaseError::PoolExhausted { max: 1, .. })));
        drop(held);
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn foreign_keys_enabled_on_every_connection() {
        let dir = TempDir::new().unwrap();
        let pool = ConnectionPool::open(url_in(&dir), PoolOptions::default())
            .await
            .unwrap();

        for _ in 0..2 {
            let conn = pool.acquire().await.unwrap();
            let on = conn.query_scalar_i64("PRAGMA foreign_keys", ()).await.unwrap();
            assert_eq!(on, Some(1));
        }
    }

    #[tokio::test]
    async fn wal_flag_switches_journal_mode() {
        let dir = TempDir::new().unwrap();
        let url = DatabaseUrl::parse(&format!(
            "file:{}/wal.db;JOURNAL_MODE=WAL",
            dir.path().display()
        ))
        .unwrap();
        let pool = ConnectionPool::open(url, PoolOptions::default()).await.unwrap();
        let conn = pool.acquire().await.unwrap();

        let mut rows = conn.query("PRAGMA journal_mode", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap().to_ascii_lowercase(), "wal");
    }

    #[tokio::test]
    async fn unknown_flags_are_ignored_by_the_engine() {
        let dir = TempDir::new().unwrap();
        let url = DatabaseUrl::parse(&format!(
            "file:{}/bad.db;NOT_A_PRAGMA_BUT_A_TABLE=x",
            dir.path().display()
        ))
        .unwrap();
        let pool = ConnectionPool::open(url, PoolOptions::default()).await.unwrap();
        // Unknown pragmas are ignored by the engine, so this still connects.
        assert!(pool.acquire().await.is_ok());
        assert_eq!(pool.active_connections(), 0);
    }
}
