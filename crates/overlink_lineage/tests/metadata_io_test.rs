//! Remix metadata document load/save tests

use overlink_core::FixedClock;
use overlink_lineage::prelude::*;
use std::sync::Arc;

fn origin() -> RemixOrigin {
    RemixOrigin {
        id: "origin_toppler".into(),
        original_project: "Toppler".into(),
        original_contributor: "studio_a".into(),
        remix_contributor: "remixer_b".into(),
        remix_date: "2024-03-01".into(),
        remix_license: "CC-BY-4.0".into(),
        remix_notes: Some("Palette swap".into()),
    }
}

#[test]
fn test_save_then_load() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("remix_meta.json");

    let mut source = AssetLineageRegistry::with_clock(&path, Arc::new(FixedClock::epoch()));
    source.register_remix_origin(origin());
    source.register_asset_lineage(
        AssetLineage::new("grid", "grid.png", "remix/grid.png", true)
            .with_contributors(["studio_a", "remixer_b"])
            .with_checksum("abc123"),
    );
    source.validate_all_assets();
    source.save_metadata().expect("Should save metadata");

    let mut target = AssetLineageRegistry::with_clock(&path, Arc::new(FixedClock::epoch()));
    assert!(target.load_metadata().expect("Should load metadata"));

    let lineage = target.asset_lineage("grid").expect("Should restore lineage");
    assert_eq!(lineage.checksum, "abc123");
    assert_eq!(lineage.validation_status, ValidationStatus::Validated);
    assert_eq!(target.remix_origins(), source.remix_origins());
    assert_eq!(target.contributor_role("remixer_b"), Some("Unknown Role"));
}

#[test]
fn test_save_without_metadata_writes_nothing() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("remix_meta.json");

    let mut registry = AssetLineageRegistry::new(&path);
    registry.save_metadata().expect("Should be a no-op");
    assert!(!path.exists());
}

#[test]
fn test_missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let mut registry = AssetLineageRegistry::new(dir.path().join("absent.json"));
    registry.register_asset_lineage(AssetLineage::new("kept", "kept.png", "r.png", true));

    assert!(!registry.load_metadata().expect("Missing file should be Ok"));
    assert!(registry.asset_lineage("kept").is_some());
    assert!(registry.metadata().is_none());
}

#[test]
fn test_malformed_file_keeps_state() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("remix_meta.json");
    std::fs::write(&path, "{ not json").expect("Should write file");

    let mut registry = AssetLineageRegistry::new(&path);
    registry.register_asset_lineage(AssetLineage::new("kept", "kept.png", "r.png", true));

    let result = registry.load_metadata();
    assert!(matches!(result, Err(LineageError::Json(_))));
    assert_eq!(registry.total_assets(), 1);
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("nested").join("remix_meta.json");

    let mut registry = AssetLineageRegistry::new(&path);
    registry.register_remix_origin(origin());

    let result = registry.save_metadata();
    assert!(matches!(result, Err(LineageError::Io { .. })));
    assert_eq!(registry.remix_origins().len(), 1);
}
