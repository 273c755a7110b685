//! Connection URL: database path plus engine flags.
//!
//! Format: `file:<path>[;KEY=VALUE]*`. A trailing `;` is accepted and the
//! `file:` prefix is optional. Keys are case-insensitive and stored upper-case.
//!
//! `TRACE_LEVEL` is consumed by the pool (statement tracing). Every other
//! flag, `JOURNAL_MODE` included, is applied verbatim as
//! `PRAGMA <key> = <value>` on each new connection.

use std::fmt;
use std::path::{Path, PathBuf};

use lob_config::ProbeConfig;
use lob_core::errors::CoreError;

use crate::error::DatabaseError;

pub const JOURNAL_MODE: &str = "JOURNAL_MODE";
pub const TRACE_LEVEL: &str = "TRACE_LEVEL";

const SCHEME: &str = "file:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseUrl {
    path: PathBuf,
    flags: Vec<(String, String)>,
    trace_level: u8,
}

impl DatabaseUrl {
    /// Parse a connection URL.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidUrl` for an empty path, a flag without
    /// `=`, a duplicated flag, non-token characters, or a bad `TRACE_LEVEL`.
    pub fn parse(url: &str) -> Result<Self, DatabaseError> {
        let invalid = |reason: String| DatabaseError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let body = url.strip_prefix(SCHEME).unwrap_or(url);
        let mut parts = body.split(';');
        let path = parts.next().unwrap_or_default().trim();
        if path.is_empty() {
            return Err(invalid("missing database path".into()));
        }

        let mut flags: Vec<(String, String)> = Vec::new();
        for part in parts.map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid(format!("flag '{part}' is not KEY=VALUE")))?;
            let key = key.trim().to_ascii_uppercase();
            let value = value.trim();
            if !is_token(&key) || !is_token(value) {
                return Err(invalid(format!("flag '{part}' contains unsupported characters")));
            }
            if flags.iter().any(|(k, _)| *k == key) {
                return Err(invalid(format!("flag '{key}' given twice")));
            }
            flags.push((key, value.to_string()));
        }

        let trace_level = match flags.iter().find(|(k, _)| k == TRACE_LEVEL) {
            Some((_, v)) => v
                .parse::<u8>()
                .map_err(|_| invalid(format!("{TRACE_LEVEL} must be a small integer, got '{v}'")))?,
            None => 0,
        };

        Ok(Self {
            path: PathBuf::from(path),
            flags,
            trace_level,
        })
    }

    /// Build the URL for the configured workspace database and engine flags.
    ///
    /// The database path is made absolute against the current directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the path cannot be made absolute or a
    /// configured flag is not a valid token.
    pub fn from_config(config: &ProbeConfig) -> Result<Self, DatabaseError> {
        let file = config.workspace.database_file();
        let path = std::path::absolute(&file).map_err(|source| CoreError::Io { path: file, source })?;

        let mut url = format!(
            "{SCHEME}{};{JOURNAL_MODE}={};{TRACE_LEVEL}={}",
            path.display(),
            config.engine.storage_mode.journal_mode(),
            config.engine.trace_level,
        );
        for (key, value) in &config.engine.flags {
            url.push_str(&format!(";{key}={value}"));
        }
        Self::parse(&url)
    }

    /// Path of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of a flag, looked up case-insensitively.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub const fn trace_level(&self) -> u8 {
        self.trace_level
    }

    /// `PRAGMA` statements to run on every new connection, in URL order.
    pub fn pragmas(&self) -> impl Iterator<Item = String> + '_ {
        self.flags
            .iter()
            .filter(|(k, _)| k != TRACE_LEVEL)
            .map(|(k, v)| format!("PRAGMA {} = {v}", k.to_ascii_lowercase()))
    }
}

impl fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}", self.path.display())?;
        for (key, value) in &self.flags {
            write!(f, ";{key}={value}")?;
        }
        Ok(())
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
