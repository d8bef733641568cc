//! Lineage errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by remix metadata I/O
#[derive(Debug, Error)]
pub enum LineageError {
    /// File I/O error
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Malformed or unserializable metadata document
    #[error("Metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
