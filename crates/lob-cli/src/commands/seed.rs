use anyhow::Context;
use lob_config::ProbeConfig;
use lob_core::responses::SeedReport;
use lob_db::{DatabaseUrl, PoolOptions, generate};

use crate::cli::GlobalFlags;
use crate::commands::reset::reset_workspace;
use crate::output::output;

/// Handle `lobprobe seed`.
pub async fn handle(config: &ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(config).await?;
    output(&report, flags.format)
}

async fn run(config: &ProbeConfig) -> anyhow::Result<SeedReport> {
    reset_workspace(config)?;
    let url = DatabaseUrl::from_config(config)?;
    let generated = generate(&url, PoolOptions::from_config(&config.engine), Some(&config.seed))
        .await
        .with_context(|| format!("failed to seed {url}"))?;
    generated.seed.context("seed step produced no report")
}
