//! Overlink Lineage - remix provenance and validation
//!
//! Tracks where every remixed asset came from and whether it may be
//! redistributed.
//!
//! # Features
//!
//! - Asset lineage records with contributor chains
//! - Pluggable, priority-ordered validation hooks per asset kind
//! - Remix origin and contributor registry
//! - Remix metadata document load/save as JSON
//! - Bounded audit trail of every mutation
//!
//! # Example
//!
//! ```ignore
//! use overlink_lineage::prelude::*;
//!
//! let mut registry = AssetLineageRegistry::new("remix_meta.json");
//! registry.register_asset_lineage(
//!     AssetLineage::new("grid", "assets/grid.png", "remix/grid.png", true),
//! );
//! assert!(registry.validate_asset("grid"));
//! ```

pub mod error;
pub mod hooks;
pub mod lineage;
pub mod tracker;

pub mod prelude {
    pub use crate::error::LineageError;
    pub use crate::hooks::{HookDescriptor, HookOutcome, ValidationHook, ValidationHookEngine};
    pub use crate::lineage::{
        AssetKind, AssetLineage, RemixMetadata, RemixOrigin, SamplerSummary, ValidationStatus,
        ValidationSummary,
    };
    pub use crate::tracker::{AssetLineageRegistry, LineageSnapshot};
}

pub use prelude::*;
