//! Asset lineage registry with remix metadata and audit trail

use crate::error::LineageError;
use crate::hooks::{HookDescriptor, ValidationHook, ValidationHookEngine};
use crate::lineage::{
    AssetLineage, RemixMetadata, RemixOrigin, SamplerSummary, ValidationStatus,
    ValidationSummary,
};
use overlink_core::{AuditLog, OrderedMap, SharedClock, SystemClock, DEFAULT_AUDIT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Role given to contributors restored from a metadata document
const IMPORTED_ROLE: &str = "Unknown Role";

/// Number of audit entries reported by [`AssetLineageRegistry::sampler_summary`]
const RECENT_ACTIVITY: usize = 5;

/// Serializable registry state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageSnapshot {
    pub remix_metadata: Option<RemixMetadata>,
    pub validation_hooks: Vec<HookDescriptor>,
    pub asset_registry: OrderedMap<AssetLineage>,
    pub contributor_registry: OrderedMap<String>,
    pub validation_queue: Vec<String>,
    pub audit_log: AuditLog,
}

/// Tracks asset provenance, contributors and validation results
pub struct AssetLineageRegistry {
    metadata: Option<RemixMetadata>,
    hooks: ValidationHookEngine,
    assets: OrderedMap<AssetLineage>,
    contributors: OrderedMap<String>,
    validation_queue: Vec<String>,
    audit: AuditLog,
    metadata_path: PathBuf,
    clock: SharedClock,
}

impl AssetLineageRegistry {
    /// Create a registry with the default hooks and the system clock
    pub fn new(metadata_path: impl Into<PathBuf>) -> Self {
        Self::with_clock(metadata_path, Arc::new(SystemClock))
    }

    /// Create a registry with an injected clock
    pub fn with_clock(metadata_path: impl Into<PathBuf>, clock: SharedClock) -> Self {
        let mut registry = Self {
            metadata: None,
            hooks: ValidationHookEngine::empty(),
            assets: OrderedMap::new(),
            contributors: OrderedMap::new(),
            validation_queue: Vec::new(),
            audit: AuditLog::new(DEFAULT_AUDIT_CAPACITY),
            metadata_path: metadata_path.into(),
            clock,
        };
        for hook in ValidationHookEngine::default_hooks() {
            registry.add_validation_hook(hook);
        }
        registry
    }

    /// Set the audit trail capacity, keeping the newest entries
    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit.set_capacity(capacity);
        self
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    fn log_audit(&mut self, message: impl AsRef<str>) {
        self.audit.record(self.clock.as_ref(), message);
    }

    /// Keep the metadata document in step with the asset registry
    fn sync_metadata(&mut self) {
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.asset_lineages = self.assets.values().cloned().collect();
            metadata.total_assets = self.assets.len();
            metadata.remix_safe_assets = self.assets.values().filter(|a| a.remix_safe).count();
        }
    }

    // ---- remix origins and contributors ----

    /// Record a remix origin, creating placeholder metadata on first use
    pub fn register_remix_origin(&mut self, origin: RemixOrigin) {
        if self.metadata.is_none() {
            self.metadata = Some(RemixMetadata::unnamed(self.clock.now()));
            self.sync_metadata();
        }

        let message = format!(
            "Registered remix origin: {} by {}",
            origin.id, origin.remix_contributor
        );
        let original = origin.original_contributor.clone();
        let remixer = origin.remix_contributor.clone();
        if let Some(metadata) = self.metadata.as_mut() {
            metadata.remix_origins.push(origin);
        }

        self.register_contributor(original, "Original Project");
        self.register_contributor(remixer, "Remix Contributor");
        self.log_audit(message);
    }

    pub fn remix_origins(&self) -> &[RemixOrigin] {
        self.metadata
            .as_ref()
            .map(|m| m.remix_origins.as_slice())
            .unwrap_or(&[])
    }

    /// Register or re-role a contributor
    pub fn register_contributor(&mut self, id: impl Into<String>, role: impl Into<String>) {
        let id = id.into();
        self.contributors.insert(id.clone(), role.into());
        if let Some(metadata) = self.metadata.as_mut() {
            if !metadata.contributors.contains(&id) {
                metadata.contributors.push(id);
            }
        }
    }

    pub fn contributor_role(&self, id: &str) -> Option<&str> {
        self.contributors.get(id).map(String::as_str)
    }

    /// Contributors and their roles in registration order
    pub fn contributors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.contributors.iter().map(|(id, role)| (id, role.as_str()))
    }

    // ---- asset lineage ----

    /// Store a lineage record, replacing any record with the same id
    pub fn register_asset_lineage(&mut self, lineage: AssetLineage) {
        let message = format!(
            "Registered asset lineage: {} ({})",
            lineage.asset_id, lineage.validation_status
        );
        self.validation_queue.push(lineage.asset_id.clone());
        self.assets.insert(lineage.asset_id.clone(), lineage);
        self.sync_metadata();
        self.log_audit(message);
    }

    pub fn asset_lineage(&self, asset_id: &str) -> Option<&AssetLineage> {
        self.assets.get(asset_id)
    }

    /// Every lineage record in registration order
    pub fn asset_lineages(&self) -> impl Iterator<Item = &AssetLineage> {
        self.assets.values()
    }

    /// Ids queued at registration time, for introspection
    pub fn validation_queue(&self) -> &[String] {
        &self.validation_queue
    }

    pub fn total_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn remix_safe_assets(&self) -> usize {
        self.assets.values().filter(|a| a.remix_safe).count()
    }

    /// Overwrite a record's validation status; unknown ids are ignored
    pub fn update_asset_validation(
        &mut self,
        asset_id: &str,
        status: ValidationStatus,
        notes: Option<String>,
    ) -> bool {
        let now = self.clock.now();
        let Some(lineage) = self.assets.get_mut(asset_id) else {
            return false;
        };
        lineage.validation_status = status;
        lineage.validation_notes = notes;
        lineage.last_modified = now;

        self.sync_metadata();
        self.log_audit(format!("Updated asset validation: {} -> {}", asset_id, status));
        true
    }

    // ---- validation hooks ----

    /// Add or replace a validation hook
    pub fn add_validation_hook(&mut self, hook: ValidationHook) {
        let message = format!("Added validation hook: {} ({})", hook.id, hook.kind);
        self.hooks.add(hook);
        self.log_audit(message);
    }

    pub fn remove_validation_hook(&mut self, id: &str) -> bool {
        let removed = self.hooks.remove(id);
        if removed {
            self.log_audit(format!("Removed validation hook: {}", id));
        }
        removed
    }

    /// Flip a hook, returning its new enabled state (`false` when unknown)
    pub fn toggle_validation_hook(&mut self, id: &str) -> bool {
        if self.hooks.get(id).is_none() {
            return false;
        }
        let enabled = self.hooks.toggle(id);
        let verb = if enabled { "Enabled" } else { "Disabled" };
        self.log_audit(format!("{} validation hook: {}", verb, id));
        enabled
    }

    pub fn hooks(&self) -> &ValidationHookEngine {
        &self.hooks
    }

    /// Validate one asset against the hooks for its kind
    pub fn validate_asset(&mut self, asset_id: &str) -> bool {
        let Some(lineage) = self.assets.get(asset_id) else {
            return false;
        };

        let outcome = self.hooks.evaluate(lineage);
        let valid = outcome.is_valid();
        if !valid {
            self.log_audit(format!("Validation failed for {}: {}", asset_id, outcome.note()));
        }

        let status = if valid {
            ValidationStatus::Validated
        } else {
            ValidationStatus::Failed
        };
        self.update_asset_validation(asset_id, status, Some(outcome.note()));
        valid
    }

    /// Validate every registered asset in registration order
    pub fn validate_all_assets(&mut self) -> ValidationSummary {
        let ids: Vec<String> = self.assets.keys().map(str::to_string).collect();
        let mut summary = ValidationSummary {
            total: ids.len(),
            ..Default::default()
        };

        for id in &ids {
            if self.validate_asset(id) {
                summary.validated += 1;
            } else {
                summary.failed += 1;
            }
        }

        self.log_audit(format!(
            "Bulk validation complete: {}/{} assets validated",
            summary.validated, summary.total
        ));
        log::info!(
            "Validated {}/{} assets ({} failed)",
            summary.validated,
            summary.total,
            summary.failed
        );
        summary
    }

    // ---- metadata document ----

    pub fn metadata(&self) -> Option<&RemixMetadata> {
        self.metadata.as_ref()
    }

    /// Refresh totals and the validation timestamp, then return the document
    pub fn export_metadata(&mut self) -> Option<RemixMetadata> {
        let now = self.clock.now();
        self.sync_metadata();
        let metadata = self.metadata.as_mut()?;
        metadata.validation_timestamp = now;
        Some(metadata.clone())
    }

    /// Replace the registries with the contents of a metadata document
    pub fn import_metadata(&mut self, metadata: RemixMetadata) {
        self.assets = metadata
            .asset_lineages
            .iter()
            .map(|l| (l.asset_id.clone(), l.clone()))
            .collect();
        self.contributors = metadata
            .contributors
            .iter()
            .map(|id| (id.clone(), IMPORTED_ROLE.to_string()))
            .collect();

        let message = format!("Imported metadata for project: {}", metadata.project_name);
        self.metadata = Some(metadata);
        self.sync_metadata();
        self.log_audit(message);
    }

    /// Write the metadata document as pretty JSON; no-op without metadata
    pub fn save_metadata(&mut self) -> Result<(), LineageError> {
        let Some(metadata) = self.export_metadata() else {
            return Ok(());
        };

        let result = serde_json::to_vec_pretty(&metadata)
            .map_err(LineageError::from)
            .and_then(|json| {
                fs::write(&self.metadata_path, json).map_err(|source| LineageError::Io {
                    path: self.metadata_path.clone(),
                    source,
                })
            });

        match &result {
            Ok(()) => {
                let message = format!("Metadata saved to {}", self.metadata_path.display());
                log::info!("{}", message);
                self.log_audit(message);
            }
            Err(e) => self.log_audit(format!("Failed to save metadata: {}", e)),
        }
        result
    }

    /// Read the metadata document.
    ///
    /// Returns `Ok(false)` when the file does not exist; the registry keeps
    /// its current state. Other I/O and parse errors leave state untouched.
    pub fn load_metadata(&mut self) -> Result<bool, LineageError> {
        let bytes = match fs::read(&self.metadata_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!(
                    "No remix metadata at {}, continuing with empty state",
                    self.metadata_path.display()
                );
                self.log_audit(format!(
                    "Failed to load metadata: {} not found",
                    self.metadata_path.display()
                ));
                return Ok(false);
            }
            Err(source) => {
                self.log_audit(format!("Failed to load metadata: {}", source));
                return Err(LineageError::Io {
                    path: self.metadata_path.clone(),
                    source,
                });
            }
        };

        let metadata: RemixMetadata = match serde_json::from_slice(&bytes) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Malformed remix metadata: {}", e);
                self.log_audit(format!("Failed to load metadata: {}", e));
                return Err(e.into());
            }
        };

        self.import_metadata(metadata);
        self.log_audit(format!("Metadata loaded from {}", self.metadata_path.display()));
        Ok(true)
    }

    // ---- reporting ----

    /// Plain-text summary of the metadata document
    pub fn cli_summary(&mut self) -> String {
        let Some(metadata) = self.export_metadata() else {
            return "No remix metadata available".to_string();
        };

        let mut out = String::new();
        let _ = writeln!(out, "Remix Project: {}", metadata.project_name);
        let _ = writeln!(out, "Version: {}", metadata.version);
        let _ = writeln!(out, "Total Assets: {}", metadata.total_assets);
        let _ = writeln!(out, "Remix-Safe Assets: {}", metadata.remix_safe_assets);
        let _ = writeln!(out, "Contributors: {}", metadata.contributors.len());
        let _ = writeln!(out, "Validation: {}\n", metadata.validation_timestamp.to_rfc3339());

        out.push_str("Remix Origins:\n");
        for origin in &metadata.remix_origins {
            let _ = writeln!(
                out,
                "  {}: {} → {}",
                origin.id, origin.original_project, origin.remix_contributor
            );
        }

        out.push_str("\nAsset Lineages:\n");
        for lineage in &metadata.asset_lineages {
            let safety = if lineage.remix_safe { "safe" } else { "restricted" };
            let _ = writeln!(
                out,
                "  {}: {} ({})",
                lineage.asset_id, lineage.validation_status, safety
            );
        }
        out
    }

    /// Totals, aggregate status and the latest audit entries
    pub fn sampler_summary(&mut self) -> SamplerSummary {
        let recent_activity = self.audit.recent(RECENT_ACTIVITY);
        match self.export_metadata() {
            Some(metadata) => {
                let all_validated = metadata
                    .asset_lineages
                    .iter()
                    .all(|a| a.validation_status == ValidationStatus::Validated);
                SamplerSummary {
                    total_assets: metadata.total_assets,
                    remix_safe_assets: metadata.remix_safe_assets,
                    validation_status: if all_validated { "Validated" } else { "Pending" }
                        .to_string(),
                    contributors: metadata.contributors,
                    recent_activity,
                }
            }
            None => SamplerSummary {
                total_assets: 0,
                remix_safe_assets: 0,
                validation_status: "No metadata".to_string(),
                contributors: Vec::new(),
                recent_activity: Vec::new(),
            },
        }
    }

    pub fn audit_log(&self) -> &AuditLog {
        &self.audit
    }

    // ---- snapshots ----

    pub fn export_state(&self) -> LineageSnapshot {
        LineageSnapshot {
            remix_metadata: self.metadata.clone(),
            validation_hooks: self.hooks.descriptors(),
            asset_registry: self.assets.clone(),
            contributor_registry: self.contributors.clone(),
            validation_queue: self.validation_queue.clone(),
            audit_log: self.audit.clone(),
        }
    }

    /// Restore a snapshot. Hook validators stay as registered; only their
    /// flags and priorities are taken from the snapshot.
    pub fn import_state(&mut self, snapshot: LineageSnapshot) {
        self.metadata = snapshot.remix_metadata;
        self.hooks.apply_descriptors(&snapshot.validation_hooks);
        self.assets = snapshot.asset_registry;
        self.contributors = snapshot.contributor_registry;
        self.validation_queue = snapshot.validation_queue;
        self.audit = snapshot.audit_log;
    }
}
