//! Overlay layer visibility and debug mode

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Independent overlay drawn on top of a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayLayer {
    Debug,
    Ui,
    Transition,
    Preview,
    Navigation,
}

impl OverlayLayer {
    pub const ALL: [OverlayLayer; 5] = [
        Self::Debug,
        Self::Ui,
        Self::Transition,
        Self::Preview,
        Self::Navigation,
    ];

    pub fn visible_by_default(&self) -> bool {
        !matches!(self, Self::Debug | Self::Preview)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Ui => "ui",
            Self::Transition => "transition",
            Self::Preview => "preview",
            Self::Navigation => "navigation",
        }
    }
}

impl fmt::Display for OverlayLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of every overlay layer plus the global debug flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLayerSet {
    layers: BTreeMap<OverlayLayer, bool>,
    debug_mode: bool,
}

impl OverlayLayerSet {
    pub fn new() -> Self {
        Self {
            layers: OverlayLayer::ALL
                .iter()
                .map(|layer| (*layer, layer.visible_by_default()))
                .collect(),
            debug_mode: false,
        }
    }

    /// Flip a layer, returning its new visibility
    pub fn toggle(&mut self, layer: OverlayLayer) -> bool {
        let visible = !self.is_visible(layer);
        self.layers.insert(layer, visible);
        visible
    }

    pub fn set(&mut self, layer: OverlayLayer, visible: bool) {
        self.layers.insert(layer, visible);
    }

    pub fn is_visible(&self, layer: OverlayLayer) -> bool {
        self.layers.get(&layer).copied().unwrap_or(false)
    }

    pub fn layers(&self) -> &BTreeMap<OverlayLayer, bool> {
        &self.layers
    }

    /// Flip debug mode. Turning it on also shows the debug layer; turning it
    /// off leaves the layer alone.
    pub fn toggle_debug_mode(&mut self) -> bool {
        self.debug_mode = !self.debug_mode;
        if self.debug_mode {
            self.layers.insert(OverlayLayer::Debug, true);
        }
        self.debug_mode
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub(crate) fn restore(&mut self, layers: BTreeMap<OverlayLayer, bool>, debug_mode: bool) {
        *self = Self::new();
        self.layers.extend(layers);
        self.debug_mode = debug_mode;
    }
}

impl Default for OverlayLayerSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let set = OverlayLayerSet::new();
        assert!(!set.is_visible(OverlayLayer::Debug));
        assert!(set.is_visible(OverlayLayer::Ui));
        assert!(set.is_visible(OverlayLayer::Transition));
        assert!(!set.is_visible(OverlayLayer::Preview));
        assert!(set.is_visible(OverlayLayer::Navigation));
        assert!(!set.debug_mode());
    }

    #[test]
    fn test_toggle_is_independent() {
        let mut set = OverlayLayerSet::new();
        assert!(set.toggle(OverlayLayer::Preview));
        assert!(!set.toggle(OverlayLayer::Ui));
        assert!(set.is_visible(OverlayLayer::Navigation));
        set.set(OverlayLayer::Ui, true);
        assert!(set.is_visible(OverlayLayer::Ui));
    }

    #[test]
    fn test_debug_mode_forces_debug_layer() {
        let mut set = OverlayLayerSet::new();
        assert!(set.toggle_debug_mode());
        assert!(set.is_visible(OverlayLayer::Debug));

        assert!(!set.toggle_debug_mode());
        assert!(set.is_visible(OverlayLayer::Debug));
    }

    #[test]
    fn test_serialized_keys() {
        let set = OverlayLayerSet::new();
        let value = serde_json::to_value(set.layers()).unwrap();
        assert_eq!(value["debug"], false);
        assert_eq!(value["navigation"], true);
    }
}
