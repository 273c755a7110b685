//! Engine connection settings forwarded through the connection URL.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How the engine journals writes.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Rollback journal, deleted after every commit.
    #[default]
    Rollback,
    /// Write-ahead log.
    Wal,
}

impl StorageMode {
    /// Value of the `JOURNAL_MODE` URL flag.
    #[must_use]
    pub const fn journal_mode(self) -> &'static str {
        match self {
            Self::Rollback => "DELETE",
            Self::Wal => "WAL",
        }
    }
}

const fn default_max_connections() -> u32 {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Storage-mode flag.
    #[serde(default)]
    pub storage_mode: StorageMode,

    /// Statement tracing verbosity: 0 off, 1 statements, 2 statements and row counts.
    #[serde(default)]
    pub trace_level: u8,

    /// Upper bound on simultaneously acquired connections per pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Extra engine flags appended to the URL and applied verbatim on every connection.
    #[serde(default)]
    pub flags: BTreeMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            trace_level: 0,
            max_connections: default_max_connections(),
            flags: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = EngineConfig::default();
        assert_eq!(config.storage_mode, StorageMode::Rollback);
        assert_eq!(config.trace_level, 0);
        assert_eq!(config.max_connections, 8);
        assert!(config.flags.is_empty());
    }

    #[test]
    fn journal_modes() {
        assert_eq!(StorageMode::Rollback.journal_mode(), "DELETE");
        assert_eq!(StorageMode::Wal.journal_mode(), "WAL");
    }
}
