//! Hub errors

use overlink_audio::AudioError;
use overlink_lineage::LineageError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading [`HubConfig`](crate::config::HubConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// An environment override could not be parsed
    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Errors surfaced by the hub's I/O-facing operations
#[derive(Debug, Error)]
pub enum HubError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lineage(#[from] LineageError),
    #[error("Audio config error: {0}")]
    Audio(#[from] AudioError),
    /// Snapshot document could not be encoded or decoded
    #[error("Snapshot JSON error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type HubResult<T> = Result<T, HubError>;
