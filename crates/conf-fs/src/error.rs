//! Error types for conf-fs

use std::path::PathBuf;

/// Result type for conf-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in conf-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("lock acquisition failed for {path}")]
    Lock { path: PathBuf },

    #[error(transparent)]
    Parse(#[from] conf_content::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
