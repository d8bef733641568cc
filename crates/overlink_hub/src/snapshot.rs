//! Serializable hub state

use crate::bindings::AssetBinding;
use crate::error::HubResult;
use crate::modules::ModuleConnection;
use crate::navigation::{TransitionConfig, Zone};
use crate::overlay::OverlayLayer;
use crate::reducers::DrawReducer;
use overlink_audio::AudioSnapshot;
use overlink_core::OrderedMap;
use overlink_lineage::LineageSnapshot;
use overlink_theme::ThemeSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything needed to restore a hub exactly.
///
/// `activeModules` is informational; import recomputes it from module statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSnapshot {
    pub current_zone: Option<String>,
    #[serde(default)]
    pub previous_zone: Option<String>,
    pub zones: OrderedMap<Zone>,
    pub modules: OrderedMap<ModuleConnection>,
    #[serde(default)]
    pub active_modules: Vec<String>,
    pub overlay_layers: BTreeMap<OverlayLayer, bool>,
    pub debug_mode: bool,
    pub draw_reducers: Vec<DrawReducer>,
    pub asset_bindings: Vec<AssetBinding>,
    pub transitions: Vec<TransitionConfig>,
    pub active_theme: Option<String>,
    pub lineage_tracking: bool,
    pub themes: ThemeSnapshot,
    pub lineage: LineageSnapshot,
    pub audio: AudioSnapshot,
}

impl HubSnapshot {
    pub fn to_json(&self) -> HubResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> HubResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
