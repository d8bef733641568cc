//! Typed payloads published on the hub event bus
//!
//! Subscribe through [`OverlinkHub::subscribe`](crate::hub::OverlinkHub::subscribe)
//! and deliver with [`OverlinkHub::process_events`](crate::hub::OverlinkHub::process_events).

use crate::modules::ModuleStatus;
use crate::overlay::OverlayLayer;
use crate::navigation::TransitionConfig;

/// A module changed status; carries the recomputed active list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStatusChanged {
    pub module_id: String,
    pub status: ModuleStatus,
    pub active_modules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneEntered {
    pub from: Option<String>,
    pub to: String,
}

/// Transitions drained by `process_transitions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionsProcessed {
    pub transitions: Vec<TransitionConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayChanged {
    pub layer: OverlayLayer,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugModeChanged {
    pub enabled: bool,
}

/// Active theme changed; `None` after deactivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeChanged {
    pub theme_id: Option<String>,
    pub audio_preset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    Started { theme_id: String },
    Failed { theme_id: String, error_count: u32 },
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetValidated {
    pub asset_id: String,
    pub valid: bool,
}

/// Hub state was replaced from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateImported;
