//! Cross-cutting error types for lobprobe.
//!
//! Engine-level errors (`DatabaseError`) live in `lob-db`. Everything that can
//! fail without touching the engine (filesystem reset, fixture placement, the
//! payload codec) is reported here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by filesystem and codec helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A filesystem entry could not be read or removed during reset.
    #[error("Failed to delete {}: {source}", path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a fixture database into the working directory failed.
    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading file metadata or creating a directory failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload could not be encoded.
    #[error("Codec error: {0}")]
    Codec(String),
}
