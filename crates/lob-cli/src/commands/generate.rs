use anyhow::Context;
use lob_config::ProbeConfig;
use lob_core::responses::GenerateResponse;
use lob_core::workspace::copy_fixture;
use lob_db::{DatabaseUrl, PoolOptions, generate};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::GenerateArgs;
use crate::commands::reset::reset_workspace;
use crate::output::output;

/// Handle `lobprobe generate`.
pub async fn handle(args: &GenerateArgs, config: &ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = run(args, config).await?;
    output(&response, flags.format)
}

async fn run(args: &GenerateArgs, config: &ProbeConfig) -> anyhow::Result<GenerateResponse> {
    reset_workspace(config)?;
    let url = DatabaseUrl::from_config(config)?;
    let generated = generate(&url, PoolOptions::from_config(&config.engine), args.seed.then_some(&config.seed))
        .await
        .with_context(|| format!("failed to generate {url}"))?;

    let exported_bytes = match &args.export {
        Some(target) => Some(
            copy_fixture(url.path(), target)
                .with_context(|| format!("failed to export database to {}", target.display()))?,
        ),
        None => None,
    };

    Ok(GenerateResponse {
        database: url.path().display().to_string(),
        tables: generated.tables,
        seed: generated.seed,
        exported_to: args.export.as_ref().map(|p| p.display().to_string()),
        exported_bytes,
    })
}
