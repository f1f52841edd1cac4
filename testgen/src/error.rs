//! Run-level errors.
//!
//! Mapping misses never surface here: lookups fall back to a synthesized
//! call. Only a missing destination, a failed write and cancellation end a
//! run early.

use mbt_tree::TreeError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for generation runs.
pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("output destination {path} cannot be created: {source}")]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("generation was cancelled")]
    Cancelled,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl GenerationError {
    pub fn destination_unavailable(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::DestinationUnavailable {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true if the run stopped because it was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
