use anyhow::Context;
use lob_config::ProbeConfig;
use lob_core::responses::ResetResponse;
use lob_core::workspace::reset_dir;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `lobprobe reset`.
pub fn handle(config: &ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = reset_workspace(config)?;
    output(&response, flags.format)
}

/// Remove the working directory. Every scenario starts with this.
pub fn reset_workspace(config: &ProbeConfig) -> anyhow::Result<ResetResponse> {
    let root = &config.workspace.root;
    let outcome = reset_dir(root).with_context(|| format!("failed to reset {}", root.display()))?;
    tracing::info!(root = %root.display(), removed = outcome.removed, "workspace reset");
    Ok(ResetResponse {
        root: root.display().to_string(),
        existed: outcome.existed,
        removed: outcome.removed,
    })
}
