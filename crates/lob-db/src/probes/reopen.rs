//! Reopen-compatibility probe.
//!
//! Counts a table in the catalog, tears the pool down completely, opens a new
//! pool on the same file and counts again. A database written by one engine
//! build should answer the same way before and after a cold reopen.

use std::path::Path;

use lob_config::ProbeConfig;
use lob_core::responses::{CatalogProbe, ReopenReport};
use lob_core::workspace::copy_fixture;

use crate::error::DatabaseError;
use crate::pool::{ConnectionPool, PoolOptions};
use crate::url::DatabaseUrl;

#[derive(Debug, Clone)]
pub struct ReopenProbe {
    url: DatabaseUrl,
    options: PoolOptions,
    schema: String,
    table: String,
}

impl ReopenProbe {
    #[must_use]
    pub fn new(
        url: DatabaseUrl,
        options: PoolOptions,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            url,
            options,
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// Probe the configured workspace database for the configured table.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidUrl` if the configured flags do not form
    /// a valid connection URL.
    pub fn from_config(config: &ProbeConfig) -> Result<Self, DatabaseError> {
        Ok(Self::new(
            DatabaseUrl::from_config(config)?,
            PoolOptions::from_config(&config.engine),
            config.reopen.schema.clone(),
            config.reopen.table.clone(),
        ))
    }

    #[must_use]
    pub const fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Copy `fixture` over the probed database file, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` if the copy fails.
    pub fn place_fixture(&self, fixture: &Path) -> Result<u64, DatabaseError> {
        let bytes = copy_fixture(fixture, self.url.path())?;
        tracing::info!(fixture = %fixture.display(), bytes, "fixture placed");
        Ok(bytes)
    }

    /// One open → count → dispose cycle.
    ///
    /// # Errors
    ///
    /// Engine errors from the open or the catalog query.
    pub async fn probe_once(&self) -> Result<CatalogProbe, DatabaseError> {
        let pool = ConnectionPool::open(self.url.clone(), self.options).await?;
        let probe = pool.acquire().await?.count_tables(&self.schema, &self.table).await?;
        pool.dispose();
        tracing::debug!(schema = %probe.schema, table = %probe.table, count = probe.count, "catalog probed");
        Ok(probe)
    }

    /// Run the probe twice across a full pool restart.
    ///
    /// With `fixture`, the file is copied into place first; otherwise the
    /// database must already be there.
    ///
    /// # Errors
    ///
    /// Propagates fixture and engine errors unchanged, and returns
    /// `DatabaseError::CompatibilityMismatch` when the two counts disagree.
    pub async fn run(&self, fixture: Option<&Path>) -> Result<ReopenReport, DatabaseError> {
        if let Some(fixture) = fixture {
            self.place_fixture(fixture)?;
        }

        let first = self.probe_once().await?;
        let second = self.probe_once().await?;
        let (first, second) = compare(first, second)?;

        tracing::info!(
            schema = %first.schema,
            table = %first.table,
            exists = first.exists(),
            "reopen probe consistent"
        );
        Ok(ReopenReport {
            database: self.url.path().display().to_string(),
            fixture: fixture.map(|f| f.display().to_string()),
            first,
            second,
        })
    }
}

/// Accept the two probes only if they agree.
///
/// # Errors
///
/// Returns `DatabaseError::CompatibilityMismatch` carrying both probes.
pub fn compare(
    first: CatalogProbe,
    second: CatalogProbe,
) -> Result<(CatalogProbe, CatalogProbe), DatabaseError> {
    if first == second {
        Ok((first, second))
    } else {
        Err(DatabaseError::CompatibilityMismatch { first, second })
    }
}
