//! # lob-config
//!
//! Layered configuration loading for lobprobe using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LOBPROBE_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`
//! 3. Project-level `./lobprobe.toml`
//! 4. User-level `~/.config/lobprobe/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LOBPROBE_GROWTH__ITERATIONS` -> `growth.iterations`,
//! `LOBPROBE_ENGINE__STORAGE_MODE` -> `engine.storage_mode`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use lob_config::ProbeConfig;
//!
//! let config = ProbeConfig::load().expect("config");
//! println!("database: {}", config.workspace.database_file().display());
//! ```

mod engine;
mod error;
mod scenario;
mod workspace;

pub use engine::{EngineConfig, StorageMode};
pub use error::ConfigError;
pub use scenario::{GrowthConfig, ReopenConfig, SeedConfig};
pub use workspace::WorkspaceConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file name, looked up in the current directory.
pub const PROJECT_CONFIG_FILE: &str = "lobprobe.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LOBPROBE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProbeConfig {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub reopen: ReopenConfig,
    #[serde(default)]
    pub growth: GrowthConfig,
}

impl ProbeConfig {
    /// Load configuration from defaults, TOML files and environment variables.
    ///
    /// `.env` files are not read here; the `lobprobe` binary loads them
    /// before calling this.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, merging `explicit` above the project file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit.filter(|p| !p.is_file()) {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        let config: Self = Self::figment_with(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment_with(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit --config file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values the scenarios cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workspace.root.as_os_str().is_empty() {
            return Err(ConfigError::invalid("workspace.root", "must not be empty"));
        }
        if self.workspace.database_name.is_empty() {
            return Err(ConfigError::invalid(
                "workspace.database_name",
                "must not be empty",
            ));
        }
        if self.engine.max_connections == 0 {
            return Err(ConfigError::invalid(
                "engine.max_connections",
                "must be at least 1",
            ));
        }
        if self.growth.sample_every == 0 {
            return Err(ConfigError::invalid(
                "growth.sample_every",
                "must be at least 1",
            ));
        }
        if self.growth.counter_entries == 0 {
            return Err(ConfigError::invalid(
                "growth.counter_entries",
                "must be at least 1",
            ));
        }
        if self.reopen.schema.is_empty() || self.reopen.table.is_empty() {
            return Err(ConfigError::invalid(
                "reopen",
                "schema and table must not be empty",
            ));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lobprobe").join("config.toml"))
    }
}
