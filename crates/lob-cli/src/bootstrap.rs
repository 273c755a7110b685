use std::path::Path;

use anyhow::Context;
use lob_config::ProbeConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config and the `--root` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<ProbeConfig> {
    load_dotenv(Path::new(".env"))?;

    let config = ProbeConfig::load_from(flags.config.as_deref()).context("failed to load configuration")?;
    apply_root_override(config, flags)
}

fn apply_root_override(mut config: ProbeConfig, flags: &GlobalFlags) -> anyhow::Result<ProbeConfig> {
    if let Some(root) = &flags.root {
        config.workspace = config.workspace.with_root(root);
        config.validate().context("invalid --root")?;
    }
    tracing::debug!(root = %config.workspace.root.display(), "configuration loaded");
    Ok(config)
}

fn load_dotenv(env_path: &Path) -> anyhow::Result<()> {
    if env_path.exists() {
        dotenvy::from_path(env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn root_flag_replaces_workspace_root() {
        let flags = GlobalFlags {
            root: Some(PathBuf::from("/tmp/probe-root")),
            ..GlobalFlags::default()
        };
        let config = apply_root_override(ProbeConfig::default(), &flags).unwrap();
        assert_eq!(config.workspace.root, PathBuf::from("/tmp/probe-root"));
        assert_eq!(
            config.workspace.database_file(),
            PathBuf::from("/tmp/probe-root/databases/h2-test.db")
        );
    }

    #[test]
    fn empty_root_flag_is_rejected() {
        let flags = GlobalFlags {
            root: Some(PathBuf::new()),
            ..GlobalFlags::default()
        };
        assert!(apply_root_override(ProbeConfig::default(), &flags).is_err());
    }

    #[test]
    fn missing_dotenv_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_dotenv(&dir.path().join(".env")).is_ok());
    }
}
