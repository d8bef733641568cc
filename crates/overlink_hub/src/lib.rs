//! Overlink Hub - meta-orchestration of zones, modules and themes
//!
//! Composes independent interactive zones into one navigable, themeable,
//! remix-safe experience.
//!
//! # Features
//!
//! - Module dependency graph with gated activation
//! - Priority-ordered draw reducer pipeline
//! - Zone navigation with a FIFO transition queue
//! - Overlay layers and debug mode
//! - Asset bindings with remix fallbacks
//! - Theme, lineage and audio registries behind one facade
//! - Typed events for every state change
//! - Exact JSON snapshots of the whole hub
//!
//! # Example
//!
//! ```ignore
//! use overlink_hub::prelude::*;
//!
//! let mut hub = OverlinkHub::new();
//! hub.register_zone("hub", Some("Central Hub"), ["meta"]);
//! hub.register_module("toppler_demo", "toppler", Vec::<String>::new());
//! assert!(hub.activate_module("toppler_demo"));
//! hub.enter_zone("hub");
//! ```

pub mod bindings;
pub mod config;
pub mod credits;
pub mod error;
pub mod events;
pub mod hub;
pub mod modules;
pub mod navigation;
pub mod overlay;
pub mod reducers;
pub mod scenario;
pub mod snapshot;

pub mod prelude {
    pub use crate::bindings::{AssetBinding, AssetBindings, BindingKind};
    pub use crate::config::HubConfig;
    pub use crate::credits::{Contributor, CreditRecord, CreditsProvider, PlainCredits};
    pub use crate::error::{ConfigError, HubError, HubResult};
    pub use crate::events::{
        AssetValidated, AudioEvent, DebugModeChanged, ModuleStatusChanged, OverlayChanged,
        StateImported, ThemeChanged, TransitionsProcessed, ZoneEntered,
    };
    pub use crate::hub::{HubBuilder, OverlinkHub};
    pub use crate::modules::{ModuleConnection, ModuleGraph, ModuleStatus};
    pub use crate::navigation::{TransitionConfig, TransitionKind, Zone, ZoneNavigator};
    pub use crate::overlay::{OverlayLayer, OverlayLayerSet};
    pub use crate::reducers::{DrawReducer, DrawReducerPipeline, ReducerKind};
    pub use crate::scenario::{run_scenario, ScenarioConfig, ScenarioOutput, ScenarioStatus};
    pub use crate::snapshot::HubSnapshot;
}

pub use prelude::*;
