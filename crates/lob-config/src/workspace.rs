//! Working directory layout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_root() -> PathBuf {
    PathBuf::from("junit")
}

fn default_database_dir() -> String {
    "databases".to_string()
}

fn default_database_name() -> String {
    "h2-test".to_string()
}

fn default_extension() -> String {
    "db".to_string()
}

/// Where the harness keeps its database. The root is owned by the harness
/// and wiped at the start of every scenario.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Root working directory, relative to the current directory unless absolute.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Subdirectory of `root` holding database files.
    #[serde(default = "default_database_dir")]
    pub database_dir: String,

    /// Database file stem.
    #[serde(default = "default_database_name")]
    pub database_name: String,

    /// Database file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            database_dir: default_database_dir(),
            database_name: default_database_name(),
            extension: default_extension(),
        }
    }
}

impl WorkspaceConfig {
    /// Path of the database file: `{root}/{database_dir}/{database_name}.{extension}`.
    #[must_use]
    pub fn database_file(&self) -> PathBuf {
        self.root
            .join(&self.database_dir)
            .join(format!("{}.{}", self.database_name, self.extension))
    }

    /// Same workspace rooted somewhere else (`--root` on the command line, tests).
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let config = WorkspaceConfig::default();
        assert_eq!(
            config.database_file(),
            PathBuf::from("junit/databases/h2-test.db")
        );
    }

    #[test]
    fn with_root_moves_database_file() {
        let config = WorkspaceConfig::default().with_root("/tmp/run-1");
        assert_eq!(
            config.database_file(),
            PathBuf::from("/tmp/run-1/databases/h2-test.db")
        );
    }
}
