//! Pluggable validation hooks
//!
//! Hooks are grouped by [`AssetKind`]. For a given asset only the enabled
//! hooks of its kind run, ascending by priority, and the first failure
//! stops the check.

use crate::lineage::{AssetKind, AssetLineage};
use overlink_core::OrderedMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Validator function. `Err` is treated as a failing result.
pub type Validator = Arc<dyn Fn(&AssetLineage) -> Result<bool, String> + Send + Sync>;

/// A single validation rule
#[derive(Clone)]
pub struct ValidationHook {
    pub id: String,
    pub kind: AssetKind,
    pub priority: i32,
    pub enabled: bool,
    validator: Validator,
}

impl ValidationHook {
    /// Create an enabled hook from a fallible validator
    pub fn new<F>(id: impl Into<String>, kind: AssetKind, priority: i32, validator: F) -> Self
    where
        F: Fn(&AssetLineage) -> Result<bool, String> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            kind,
            priority,
            enabled: true,
            validator: Arc::new(validator),
        }
    }

    /// Create an enabled hook from an infallible predicate
    pub fn from_predicate<F>(id: impl Into<String>, kind: AssetKind, priority: i32, check: F) -> Self
    where
        F: Fn(&AssetLineage) -> bool + Send + Sync + 'static,
    {
        Self::new(id, kind, priority, move |asset| Ok(check(asset)))
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run the validator
    pub fn check(&self, asset: &AssetLineage) -> Result<bool, String> {
        (self.validator)(asset)
    }

    /// Serializable view without the validator
    pub fn descriptor(&self) -> HookDescriptor {
        HookDescriptor {
            id: self.id.clone(),
            kind: self.kind,
            priority: self.priority,
            enabled: self.enabled,
        }
    }
}

impl fmt::Debug for ValidationHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationHook")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Serializable hook state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDescriptor {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub priority: i32,
    pub enabled: bool,
}

/// Result of running the hooks for one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Every applicable hook passed
    Passed { hooks_run: usize },
    /// A hook returned false
    Rejected { hook_id: String },
    /// A hook reported an error
    Errored { hook_id: String, message: String },
}

impl HookOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    /// Human-readable note stored on the lineage record
    pub fn note(&self) -> String {
        match self {
            Self::Passed { hooks_run: 0 } => "No applicable validation hooks".to_string(),
            Self::Passed { hooks_run } => format!("Passed {} validation hook(s)", hooks_run),
            Self::Rejected { hook_id } => format!("Rejected by hook {}", hook_id),
            Self::Errored { hook_id, message } => {
                format!("Hook {} raised an error: {}", hook_id, message)
            }
        }
    }
}

/// Case-insensitive extension match, consistent with [`AssetKind::from_path`]
fn has_extension(path: &str, extensions: &[&str]) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

/// Registry of validation hooks
#[derive(Debug, Clone, Default)]
pub struct ValidationHookEngine {
    hooks: OrderedMap<ValidationHook>,
}

impl ValidationHookEngine {
    /// Create an engine with no hooks
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create an engine with the built-in texture, shader and audio hooks
    pub fn with_default_hooks() -> Self {
        let mut engine = Self::empty();
        for hook in Self::default_hooks() {
            engine.add(hook);
        }
        engine
    }

    /// Built-in hooks: remix-safe assets with the canonical extension pass
    pub fn default_hooks() -> Vec<ValidationHook> {
        vec![
            ValidationHook::from_predicate("texture_validator", AssetKind::Texture, 1, |a| {
                a.remix_safe && has_extension(&a.original_path, &["png"])
            }),
            ValidationHook::from_predicate("shader_validator", AssetKind::Shader, 2, |a| {
                a.remix_safe && has_extension(&a.original_path, &["glsl"])
            }),
            ValidationHook::from_predicate("audio_validator", AssetKind::Audio, 3, |a| {
                a.remix_safe && has_extension(&a.original_path, &["ogg", "wav"])
            }),
        ]
    }

    /// Add or replace a hook
    pub fn add(&mut self, hook: ValidationHook) {
        self.hooks.insert(hook.id.clone(), hook);
    }

    /// Remove a hook, returning whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        self.hooks.remove(id).is_some()
    }

    /// Flip a hook's enabled flag; unknown ids return `false`
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.hooks.get_mut(id) {
            Some(hook) => {
                hook.enabled = !hook.enabled;
                hook.enabled
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&ValidationHook> {
        self.hooks.get(id)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Enabled hooks for a kind, ascending by priority
    pub fn applicable(&self, kind: AssetKind) -> Vec<&ValidationHook> {
        let mut hooks: Vec<&ValidationHook> = self
            .hooks
            .values()
            .filter(|h| h.enabled && h.kind == kind)
            .collect();
        hooks.sort_by_key(|h| h.priority);
        hooks
    }

    /// Run the applicable hooks against an asset
    pub fn evaluate(&self, asset: &AssetLineage) -> HookOutcome {
        let hooks = self.applicable(asset.kind());
        for hook in &hooks {
            match hook.check(asset) {
                Ok(true) => {}
                Ok(false) => {
                    return HookOutcome::Rejected {
                        hook_id: hook.id.clone(),
                    }
                }
                Err(message) => {
                    return HookOutcome::Errored {
                        hook_id: hook.id.clone(),
                        message,
                    }
                }
            }
        }
        HookOutcome::Passed {
            hooks_run: hooks.len(),
        }
    }

    /// Serializable state of every hook in registration order
    pub fn descriptors(&self) -> Vec<HookDescriptor> {
        self.hooks.values().map(ValidationHook::descriptor).collect()
    }

    /// Restore hook flags from descriptors.
    ///
    /// Hooks absent from `descriptors` are dropped; descriptors naming an
    /// unknown hook are skipped since validators cannot be deserialized.
    pub fn apply_descriptors(&mut self, descriptors: &[HookDescriptor]) {
        let mut restored = OrderedMap::new();
        for descriptor in descriptors {
            match self.hooks.remove(&descriptor.id) {
                Some(mut hook) => {
                    hook.priority = descriptor.priority;
                    hook.enabled = descriptor.enabled;
                    restored.insert(descriptor.id.clone(), hook);
                }
                None => log::warn!(
                    "Skipping validation hook '{}': no validator registered",
                    descriptor.id
                ),
            }
        }
        self.hooks = restored;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(safe: bool) -> AssetLineage {
        AssetLineage::new("tex", "art/tex.png", "remix/tex.png", safe)
    }

    #[test]
    fn test_default_hooks() {
        let engine = ValidationHookEngine::with_default_hooks();
        assert_eq!(engine.len(), 3);
        assert!(engine.evaluate(&texture(true)).is_valid());
        assert_eq!(
            engine.evaluate(&texture(false)),
            HookOutcome::Rejected {
                hook_id: "texture_validator".into()
            }
        );
    }

    #[test]
    fn test_default_hooks_ignore_extension_case() {
        let engine = ValidationHookEngine::with_default_hooks();
        for path in ["art/grid.PNG", "fx/glow.GLSL", "music/loop.Ogg", "music/hit.WAV"] {
            let asset = AssetLineage::new("a", path, "remix/a", true);
            assert!(engine.evaluate(&asset).is_valid(), "{} rejected", path);
        }
    }

    #[test]
    fn test_priority_order_short_circuits() {
        let mut engine = ValidationHookEngine::empty();
        engine.add(ValidationHook::from_predicate("late", AssetKind::Texture, 9, |_| false));
        engine.add(ValidationHook::from_predicate("early", AssetKind::Texture, -1, |_| false));

        let outcome = engine.evaluate(&texture(true));
        assert_eq!(outcome, HookOutcome::Rejected { hook_id: "early".into() });
    }

    #[test]
    fn test_error_counts_as_failure() {
        let mut engine = ValidationHookEngine::empty();
        engine.add(ValidationHook::new("broken", AssetKind::Texture, 1, |_| {
            Err("decoder crashed".to_string())
        }));

        let outcome = engine.evaluate(&texture(true));
        assert!(!outcome.is_valid());
        assert!(outcome.note().contains("decoder crashed"));
    }

    #[test]
    fn test_other_kinds_do_not_apply() {
        let mut engine = ValidationHookEngine::empty();
        engine.add(ValidationHook::from_predicate("audio_only", AssetKind::Audio, 1, |_| false));

        assert_eq!(
            engine.evaluate(&texture(false)),
            HookOutcome::Passed { hooks_run: 0 }
        );
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut engine = ValidationHookEngine::with_default_hooks();
        assert!(!engine.toggle("texture_validator"));
        assert!(engine.toggle("texture_validator"));
        assert!(!engine.toggle("missing"));
        assert!(engine.remove("shader_validator"));
        assert!(!engine.remove("shader_validator"));
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_apply_descriptors() {
        let mut engine = ValidationHookEngine::with_default_hooks();
        engine.toggle("audio_validator");
        let descriptors = engine.descriptors();

        let mut restored = ValidationHookEngine::with_default_hooks();
        restored.remove("texture_validator");
        restored.add(ValidationHook::from_predicate("extra", AssetKind::Data, 1, |_| true));
        restored.apply_descriptors(&descriptors);

        // texture_validator has no validator in `restored`, so it is skipped
        assert_eq!(restored.len(), 2);
        assert!(restored.get("extra").is_none());
        assert!(!restored.get("audio_validator").unwrap().enabled);
    }
}
