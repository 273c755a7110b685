use anyhow::Context;
use lob_config::{ProbeConfig, StorageMode};
use lob_core::responses::GrowthReport;
use lob_db::{ConnectionPool, DatabaseUrl, GrowthMonitor, PoolOptions};

use crate::cli::root_commands::GrowthArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::reset::reset_workspace;
use crate::output::{output, sample_line};

/// Handle `lobprobe growth`.
///
/// In text mode each sample is printed as soon as it is taken and the final
/// report is a summary without the samples.
pub async fn handle(args: &GrowthArgs, config: ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = apply_overrides(args, config)?;
    let streaming = flags.format == OutputFormat::Text;

    let report = run(&config, |sample| {
        if streaming {
            println!("{}", sample_line(sample));
        }
    })
    .await?;
    output(&report, flags.format)
}

fn apply_overrides(args: &GrowthArgs, mut config: ProbeConfig) -> anyhow::Result<ProbeConfig> {
    if let Some(iterations) = args.iterations {
        config.growth.iterations = iterations;
    }
    if let Some(sample_every) = args.sample_every {
        config.growth.sample_every = sample_every;
    }
    if let Some(entries) = args.entries {
        config.growth.counter_entries = entries;
    }
    if args.wal {
        config.engine.storage_mode = StorageMode::Wal;
    }
    config.validate()?;
    Ok(config)
}

async fn run(
    config: &ProbeConfig,
    observer: impl FnMut(&lob_core::responses::SizeSample),
) -> anyhow::Result<GrowthReport> {
    reset_workspace(config)?;
    let url = DatabaseUrl::from_config(config)?;
    let pool = ConnectionPool::open(url, PoolOptions::from_config(&config.engine))
        .await
        .context("failed to open database")?;

    let report = GrowthMonitor::new(&config.growth)
        .run(&pool, observer)
        .await
        .context("growth monitor failed")?;
    pool.dispose();
    Ok(report)
}
