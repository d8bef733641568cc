//! Zone registry, navigation and the transition queue

use crate::overlay::OverlayLayer;
use overlink_core::OrderedMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Navigable unit of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub display_name: String,
    pub tags: Vec<String>,
}

/// Visual style of a zone change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    #[default]
    Fade,
    Slide,
    Zoom,
    Dissolve,
    Instant,
}

/// Queued description of a zone change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_zone: Option<String>,
    pub to_zone: String,
    #[serde(rename = "type")]
    pub kind: TransitionKind,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<OverlayLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<String>>,
}

impl TransitionConfig {
    pub fn new(to_zone: impl Into<String>, kind: TransitionKind, duration_ms: u64) -> Self {
        Self {
            from_zone: None,
            to_zone: to_zone.into(),
            kind,
            duration_ms,
            overlay: None,
            effects: None,
        }
    }

    pub fn from_zone(mut self, zone: impl Into<String>) -> Self {
        self.from_zone = Some(zone.into());
        self
    }

    pub fn with_overlay(mut self, overlay: OverlayLayer) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_effects<I, S>(mut self, effects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.effects = Some(effects.into_iter().map(Into::into).collect());
        self
    }
}

/// Tracks the current zone and the FIFO of pending transitions
#[derive(Debug, Clone)]
pub struct ZoneNavigator {
    zones: OrderedMap<Zone>,
    current: Option<String>,
    previous: Option<String>,
    queue: VecDeque<TransitionConfig>,
    transition_kind: TransitionKind,
    transition_duration_ms: u64,
}

impl ZoneNavigator {
    pub fn new(transition_kind: TransitionKind, transition_duration_ms: u64) -> Self {
        Self {
            zones: OrderedMap::new(),
            current: None,
            previous: None,
            queue: VecDeque::new(),
            transition_kind,
            transition_duration_ms,
        }
    }

    /// Register a zone. A missing display name falls back to the id.
    pub fn register_zone<I, S>(&mut self, id: &str, display_name: Option<&str>, tags: I) -> Zone
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let zone = Zone {
            id: id.to_string(),
            display_name: display_name.unwrap_or(id).to_string(),
            tags: tags.into_iter().map(Into::into).collect(),
        };
        self.zones.insert(id, zone.clone());
        zone
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    /// Move to a zone, queueing a transition from the previous one.
    ///
    /// Returns `false` when `id` is already current.
    pub fn enter_zone(&mut self, id: &str) -> bool {
        if self.current.as_deref() == Some(id) {
            return false;
        }
        if !self.zones.contains_key(id) {
            log::debug!("Entering unregistered zone {}", id);
        }

        let previous = self.current.replace(id.to_string());
        if let Some(from) = &previous {
            let transition =
                TransitionConfig::new(id, self.transition_kind, self.transition_duration_ms)
                    .from_zone(from.clone());
            self.queue.push_back(transition);
        }
        self.previous = previous;
        true
    }

    pub fn current_zone(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn previous_zone(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    pub fn queue_transition(&mut self, transition: TransitionConfig) {
        self.queue.push_back(transition);
    }

    /// Take every pending transition, leaving the queue empty
    pub fn process_transitions(&mut self) -> Vec<TransitionConfig> {
        self.queue.drain(..).collect()
    }

    pub fn pending_transitions(&self) -> impl Iterator<Item = &TransitionConfig> {
        self.queue.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn export(&self) -> (OrderedMap<Zone>, Vec<TransitionConfig>) {
        (self.zones.clone(), self.queue.iter().cloned().collect())
    }

    pub(crate) fn restore(
        &mut self,
        zones: OrderedMap<Zone>,
        current: Option<String>,
        previous: Option<String>,
        transitions: Vec<TransitionConfig>,
    ) {
        self.zones = zones;
        self.current = current;
        self.previous = previous;
        self.queue = transitions.into();
    }
}

impl Default for ZoneNavigator {
    fn default() -> Self {
        Self::new(TransitionKind::Fade, 300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_zone_defaults_display_name() {
        let mut nav = ZoneNavigator::default();
        let zone = nav.register_zone("hub", None, ["meta"]);
        assert_eq!(zone.display_name, "hub");

        nav.register_zone("toppler", Some("Toppler Demo"), ["physics", "puzzle"]);
        assert_eq!(nav.zone("toppler").unwrap().display_name, "Toppler Demo");
        assert_eq!(nav.zones().count(), 2);
    }

    #[test]
    fn test_first_zone_queues_nothing() {
        let mut nav = ZoneNavigator::default();
        assert!(nav.enter_zone("hub"));
        assert_eq!(nav.current_zone(), Some("hub"));
        assert!(nav.process_transitions().is_empty());
    }

    #[test]
    fn test_zone_change_queues_default_transition() {
        let mut nav = ZoneNavigator::default();
        nav.enter_zone("hub");
        nav.enter_zone("toppler");

        let transitions = nav.process_transitions();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from_zone.as_deref(), Some("hub"));
        assert_eq!(transitions[0].to_zone, "toppler");
        assert_eq!(transitions[0].kind, TransitionKind::Fade);
        assert_eq!(transitions[0].duration_ms, 300);
        assert_eq!(nav.previous_zone(), Some("hub"));

        assert!(nav.process_transitions().is_empty());
    }

    #[test]
    fn test_reentering_current_zone_is_noop() {
        let mut nav = ZoneNavigator::default();
        nav.enter_zone("hub");
        nav.enter_zone("toppler");
        assert!(!nav.enter_zone("toppler"));
        assert_eq!(nav.pending_count(), 1);
        assert_eq!(nav.previous_zone(), Some("hub"));
    }

    #[test]
    fn test_configured_transition() {
        let mut nav = ZoneNavigator::new(TransitionKind::Dissolve, 750);
        nav.enter_zone("a");
        nav.enter_zone("b");
        let pending: Vec<_> = nav.pending_transitions().collect();
        assert_eq!(pending[0].kind, TransitionKind::Dissolve);
        assert_eq!(pending[0].duration_ms, 750);
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut nav = ZoneNavigator::default();
        nav.queue_transition(
            TransitionConfig::new("preview", TransitionKind::Zoom, 500)
                .with_overlay(OverlayLayer::Preview)
                .with_effects(["blur"]),
        );
        nav.enter_zone("hub");
        nav.enter_zone("preview");

        let transitions = nav.process_transitions();
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].kind, TransitionKind::Zoom);
        assert_eq!(transitions[1].from_zone.as_deref(), Some("hub"));
    }

    #[test]
    fn test_transition_json_shape() {
        let transition = TransitionConfig::new("b", TransitionKind::Fade, 300).from_zone("a");
        let value = serde_json::to_value(&transition).unwrap();
        assert_eq!(value["fromZone"], "a");
        assert_eq!(value["type"], "fade");
        assert_eq!(value["duration"], 300);
        assert!(value.get("overlay").is_none());
    }
}
