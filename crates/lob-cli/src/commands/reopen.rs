use anyhow::Context;
use lob_config::ProbeConfig;
use lob_core::responses::ReopenReport;
use lob_db::{PoolOptions, ReopenProbe, generate};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReopenArgs;
use crate::commands::reset::reset_workspace;
use crate::output::output;

/// Handle `lobprobe reopen`.
pub async fn handle(args: &ReopenArgs, config: ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = apply_overrides(args, config);
    let report = run(&config).await?;
    output(&report, flags.format)
}

fn apply_overrides(args: &ReopenArgs, mut config: ProbeConfig) -> ProbeConfig {
    if let Some(fixture) = &args.fixture {
        config.reopen.fixture = fixture.display().to_string();
    }
    if let Some(schema) = &args.schema {
        config.reopen.schema.clone_from(schema);
    }
    if let Some(table) = &args.table {
        config.reopen.table.clone_from(table);
    }
    config
}

/// With a fixture, probe a copy of it; otherwise generate and seed a fresh
/// database first.
async fn run(config: &ProbeConfig) -> anyhow::Result<ReopenReport> {
    reset_workspace(config)?;
    let probe = ReopenProbe::from_config(config)?;
    let fixture = config.reopen.fixture_path();

    if fixture.is_none() {
        let url = probe.url();
        generate(url, PoolOptions::from_config(&config.engine), Some(&config.seed))
            .await
            .with_context(|| format!("failed to prepare {url}"))?;
    }

    probe
        .run(fixture.as_deref())
        .await
        .context("reopen-compatibility probe failed")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn config_in(dir: &TempDir) -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.workspace = config.workspace.with_root(dir.path().join("junit"));
        config
    }

    #[test]
    fn flags_override_configured_target() {
        let args = ReopenArgs {
            fixture: Some(PathBuf::from("fixtures/old.db")),
            schema: Some("PUBLIC".into()),
            table: None,
        };
        let config = apply_overrides(&args, ProbeConfig::default());
        assert_eq!(config.reopen.fixture, "fixtures/old.db");
        assert_eq!(config.reopen.schema, "PUBLIC");
        assert_eq!(config.reopen.table, "dataPoints");
    }

    #[tokio::test]
    async fn fresh_database_finds_its_table_twice() {
        let dir = TempDir::new().unwrap();
        let report = run(&config_in(&dir)).await.unwrap();

        assert_eq!(report.first.count, 1);
        assert_eq!(report.first, report.second);
        assert_eq!(report.fixture, None);
    }

    #[tokio::test]
    async fn missing_fixture_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.reopen.fixture = dir.path().join("absent.db").display().to_string();

        let err = run(&config).await.unwrap_err();
        assert!(format!("{err:#}").contains("absent.db"));
    }
}
