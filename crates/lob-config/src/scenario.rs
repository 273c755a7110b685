//! Per-scenario parameters: seed values, reopen probe target, growth loop.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_source_value() -> i64 {
    1
}

const fn default_point_value() -> i64 {
    2
}

fn default_tag_key() -> String {
    "KEY".to_string()
}

fn default_tag_value() -> String {
    "VALUE".to_string()
}

/// Values written by the seed step.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SeedConfig {
    #[serde(default = "default_source_value")]
    pub source_value: i64,

    #[serde(default = "default_point_value")]
    pub point_value: i64,

    #[serde(default = "default_tag_key")]
    pub tag_key: String,

    #[serde(default = "default_tag_value")]
    pub tag_value: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            source_value: default_source_value(),
            point_value: default_point_value(),
            tag_key: default_tag_key(),
            tag_value: default_tag_value(),
        }
    }
}

fn default_schema() -> String {
    "main".to_string()
}

fn default_table() -> String {
    "dataPoints".to_string()
}

/// Reopen-compatibility probe target.
///
/// `schema` and `table` are compared exactly against the engine catalog,
/// so their case must match what the catalog stores.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReopenConfig {
    /// Database file produced by an earlier engine version. Empty means
    /// "create a fresh database instead".
    #[serde(default)]
    pub fixture: String,

    #[serde(default = "default_schema")]
    pub schema: String,

    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for ReopenConfig {
    fn default() -> Self {
        Self {
            fixture: String::new(),
            schema: default_schema(),
            table: default_table(),
        }
    }
}

impl ReopenConfig {
    #[must_use]
    pub fn fixture_path(&self) -> Option<PathBuf> {
        (!self.fixture.is_empty()).then(|| PathBuf::from(&self.fixture))
    }
}

const fn default_iterations() -> u32 {
    200
}

const fn default_sample_every() -> u32 {
    10
}

const fn default_counter_entries() -> u32 {
    10_000
}

/// Growth monitor loop parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct GrowthConfig {
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Sample the file size when `iteration % sample_every == 0`.
    #[serde(default = "default_sample_every")]
    pub sample_every: u32,

    #[serde(default = "default_counter_entries")]
    pub counter_entries: u32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            sample_every: default_sample_every(),
            counter_entries: default_counter_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_defaults_match_reference_run() {
        let config = GrowthConfig::default();
        assert_eq!(config.iterations, 200);
        assert_eq!(config.sample_every, 10);
        assert_eq!(config.counter_entries, 10_000);
    }

    #[test]
    fn empty_fixture_means_fresh_database() {
        let mut config = ReopenConfig::default();
        assert_eq!(config.fixture_path(), None);

        config.fixture = "data/h2-test.db".into();
        assert_eq!(config.fixture_path(), Some(PathBuf::from("data/h2-test.db")));
    }

    #[test]
    fn seed_defaults() {
        let config = SeedConfig::default();
        assert_eq!((config.source_value, config.point_value), (1, 2));
        assert_eq!(config.tag_key, "KEY");
        assert_eq!(config.tag_value, "VALUE");
    }
}
