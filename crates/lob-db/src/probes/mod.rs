//! The harness scenarios built on the pool: database generation, the
//! reopen-compatibility probe and the LOB growth monitor.

pub mod growth;
pub mod reopen;

use lob_config::SeedConfig;
use lob_core::responses::SeedReport;

use crate::error::DatabaseError;
use crate::pool::{ConnectionPool, PoolOptions};
use crate::repos::seed_chain;
use crate::url::DatabaseUrl;

pub use growth::GrowthMonitor;
pub use reopen::ReopenProbe;

/// What [`generate`] left behind in the database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub tables: Vec<String>,
    pub seed: Option<SeedReport>,
}

/// Open a pool, create the relational schema, optionally seed it, and dispose
/// the pool so the file is closed and ready to be probed or exported.
///
/// # Errors
///
/// Propagates connection, schema and seed failures.
pub async fn generate(
    url: &DatabaseUrl,
    options: PoolOptions,
    seed: Option<&SeedConfig>,
) -> Result<Generated, DatabaseError> {
    let pool = ConnectionPool::open(url.clone(), options).await?;
    let tables = pool.acquire().await?.bootstrap_relational().await?;
    let seed = match seed {
        Some(config) => Some(seed_chain(&pool, config).await?),
        None => None,
    };
    pool.dispose();
    tracing::info!(%url, seeded = seed.is_some(), "database generated");
    Ok(Generated { tables, seed })
}
