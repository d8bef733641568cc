//! Priority-ordered draw reducer pipeline

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a reducer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducerKind {
    Sprite,
    Ui,
    Effect,
    Debug,
}

/// A named, prioritized, toggleable render operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawReducer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ReducerKind,
    /// Lower runs earlier
    pub priority: i32,
    pub enabled: bool,
    /// Opaque payload for the renderer
    #[serde(default)]
    pub data: Value,
}

impl DrawReducer {
    /// Create an enabled reducer with an empty payload
    pub fn new(id: impl Into<String>, kind: ReducerKind, priority: i32) -> Self {
        Self {
            id: id.into(),
            kind,
            priority,
            enabled: true,
            data: Value::Object(Default::default()),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

/// Reducers kept sorted ascending by priority.
///
/// Equal priorities keep registration order.
#[derive(Debug, Clone, Default)]
pub struct DrawReducerPipeline {
    reducers: Vec<DrawReducer>,
}

impl DrawReducerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a reducer. An existing reducer with the same id is replaced and
    /// the newcomer is ordered as if freshly registered.
    pub fn add(&mut self, reducer: DrawReducer) {
        self.reducers.retain(|r| r.id != reducer.id);
        self.reducers.push(reducer);
        self.sort();
    }

    fn sort(&mut self) {
        self.reducers.sort_by_key(|r| r.priority);
    }

    /// Flip a reducer's enabled flag, returning the new value
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.reducers.iter_mut().find(|r| r.id == id) {
            Some(reducer) => {
                reducer.enabled = !reducer.enabled;
                reducer.enabled
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.reducers.len();
        self.reducers.retain(|r| r.id != id);
        self.reducers.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&DrawReducer> {
        self.reducers.iter().find(|r| r.id == id)
    }

    /// Enabled reducers in draw order
    pub fn visible(&self) -> Vec<&DrawReducer> {
        self.reducers.iter().filter(|r| r.enabled).collect()
    }

    /// Every reducer in draw order
    pub fn all(&self) -> &[DrawReducer] {
        &self.reducers
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }

    pub(crate) fn restore(&mut self, reducers: Vec<DrawReducer>) {
        self.reducers = reducers;
        self.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(reducers: &[&DrawReducer]) -> Vec<String> {
        reducers.iter().map(|r| r.id.clone()).collect()
    }

    fn pipeline() -> DrawReducerPipeline {
        let mut pipeline = DrawReducerPipeline::new();
        pipeline.add(DrawReducer::new("sprite_renderer", ReducerKind::Sprite, 1));
        pipeline.add(DrawReducer::new("ui_renderer", ReducerKind::Ui, 10));
        pipeline.add(DrawReducer::new("effect_renderer", ReducerKind::Effect, 5));
        pipeline.add(
            DrawReducer::new("debug_renderer", ReducerKind::Debug, 100).with_enabled(false),
        );
        pipeline
    }

    #[test]
    fn test_visible_sorted_by_priority() {
        let pipeline = pipeline();
        assert_eq!(
            ids(&pipeline.visible()),
            ["sprite_renderer", "effect_renderer", "ui_renderer"]
        );
        assert_eq!(pipeline.all().len(), 4);
        assert_eq!(pipeline.all()[3].id, "debug_renderer");
    }

    #[test]
    fn test_toggle_keeps_relative_order() {
        let mut pipeline = pipeline();
        assert!(!pipeline.toggle("effect_renderer"));
        assert_eq!(ids(&pipeline.visible()), ["sprite_renderer", "ui_renderer"]);

        assert!(pipeline.toggle("debug_renderer"));
        assert_eq!(
            ids(&pipeline.visible()),
            ["sprite_renderer", "ui_renderer", "debug_renderer"]
        );
        assert!(!pipeline.toggle("missing"));
    }

    #[test]
    fn test_equal_priorities_keep_registration_order() {
        let mut pipeline = DrawReducerPipeline::new();
        pipeline.add(DrawReducer::new("b", ReducerKind::Sprite, 2));
        pipeline.add(DrawReducer::new("a", ReducerKind::Sprite, 2));
        pipeline.add(DrawReducer::new("c", ReducerKind::Sprite, 1));
        assert_eq!(ids(&pipeline.visible()), ["c", "b", "a"]);
    }

    #[test]
    fn test_readd_replaces() {
        let mut pipeline = pipeline();
        pipeline.add(DrawReducer::new("ui_renderer", ReducerKind::Ui, 0).with_data(json!({"scale": 2.0})));
        assert_eq!(pipeline.len(), 4);
        assert_eq!(pipeline.all()[0].id, "ui_renderer");
        assert_eq!(pipeline.get("ui_renderer").unwrap().data["scale"], 2.0);
    }

    #[test]
    fn test_remove() {
        let mut pipeline = pipeline();
        assert!(pipeline.remove("sprite_renderer"));
        assert!(!pipeline.remove("sprite_renderer"));
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn test_serialized_shape() {
        let reducer = DrawReducer::new("ui_renderer", ReducerKind::Ui, 10)
            .with_data(json!({"theme": "default"}));
        let value = serde_json::to_value(&reducer).unwrap();
        assert_eq!(value["type"], "ui");
        assert_eq!(value["data"]["theme"], "default");
    }
}
