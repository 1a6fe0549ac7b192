//! Error types for registry-level operations

use std::path::PathBuf;
use thiserror::Error;

use netreg_hocon::HoconError;

/// Result type for registry-level operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while operating on registry files
#[derive(Debug, Error)]
pub enum CoreError {
    /// File could not be read or written
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The registries root directory does not exist
    #[error("registries directory not found: {0}")]
    RegistriesNotFound(PathBuf),

    /// Text-level failure, annotated with the file it came from
    #[error("{path}: {source}")]
    Hocon {
        path: PathBuf,
        #[source]
        source: HoconError,
    },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn hocon(path: impl Into<PathBuf>, source: HoconError) -> Self {
        Self::Hocon { path: path.into(), source }
    }
}
