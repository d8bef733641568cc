//! Lineage records and remix metadata document

use chrono::{DateTime, Utc};
use overlink_core::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Asset kind inferred from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
    Shader,
    Audio,
    Data,
}

impl AssetKind {
    /// Infer the kind from a path's extension, ignoring case
    pub fn from_path(path: &str) -> Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" | "jpg" | "jpeg" => Self::Texture,
            "glsl" | "vert" | "frag" => Self::Shader,
            "ogg" | "wav" | "mp3" => Self::Audio,
            _ => Self::Data,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Texture => "texture",
            Self::Shader => "shader",
            Self::Audio => "audio",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation outcome recorded on a lineage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Validated,
    Failed,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Validated => "validated",
            Self::Failed => "failed",
        })
    }
}

/// Provenance of a derived asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetLineage {
    pub asset_id: String,
    pub original_path: String,
    pub remix_path: String,
    pub remix_safe: bool,
    pub validation_status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_notes: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub contributor_chain: Vec<String>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub checksum: String,
}

impl AssetLineage {
    /// Create a pending lineage record stamped with wall time.
    ///
    /// Use [`stamped`](Self::stamped) or [`with_last_modified`](Self::with_last_modified)
    /// for a deterministic timestamp.
    pub fn new(
        asset_id: impl Into<String>,
        original_path: impl Into<String>,
        remix_path: impl Into<String>,
        remix_safe: bool,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            original_path: original_path.into(),
            remix_path: remix_path.into(),
            remix_safe,
            validation_status: ValidationStatus::Pending,
            validation_notes: None,
            dependencies: Vec::new(),
            contributor_chain: Vec::new(),
            last_modified: Utc::now(),
            checksum: String::new(),
        }
    }

    /// Set dependent asset ids
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Set the contributor chain, original author first
    pub fn with_contributors<I, S>(mut self, contributors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contributor_chain = contributors.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }

    /// Take `last_modified` from an injected clock
    pub fn stamped(self, clock: &dyn Clock) -> Self {
        self.with_last_modified(clock.now())
    }

    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = at;
        self
    }

    /// Kind inferred from the original path
    pub fn kind(&self) -> AssetKind {
        AssetKind::from_path(&self.original_path)
    }
}

/// Where a remix came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixOrigin {
    pub id: String,
    pub original_project: String,
    pub original_contributor: String,
    pub remix_contributor: String,
    pub remix_date: String,
    pub remix_license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remix_notes: Option<String>,
}

/// Remix metadata document, saved as a single JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemixMetadata {
    pub project_id: String,
    pub project_name: String,
    pub version: String,
    #[serde(default)]
    pub remix_origins: Vec<RemixOrigin>,
    #[serde(default)]
    pub asset_lineages: Vec<AssetLineage>,
    #[serde(default)]
    pub contributors: Vec<String>,
    pub total_assets: usize,
    pub remix_safe_assets: usize,
    pub validation_timestamp: DateTime<Utc>,
}

impl RemixMetadata {
    /// Placeholder metadata created the first time an origin is registered
    pub fn unnamed(now: DateTime<Utc>) -> Self {
        Self {
            project_id: format!("remix_{}", now.timestamp_millis()),
            project_name: "Unknown Remix Project".to_string(),
            version: "1.0.0".to_string(),
            remix_origins: Vec::new(),
            asset_lineages: Vec::new(),
            contributors: Vec::new(),
            total_assets: 0,
            remix_safe_assets: 0,
            validation_timestamp: now,
        }
    }
}

/// Result of a bulk validation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub validated: usize,
    pub failed: usize,
}

/// Compact lineage status for sampler-style dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplerSummary {
    pub total_assets: usize,
    pub remix_safe_assets: usize,
    pub validation_status: String,
    pub contributors: Vec<String>,
    pub recent_activity: Vec<String>,
}
