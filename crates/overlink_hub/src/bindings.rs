//! Zone-level asset bindings

use overlink_core::OrderedMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    Texture,
    Audio,
    Model,
    Shader,
    Data,
}

/// Asset made available to zones, with an optional remix-safe substitute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBinding {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BindingKind,
    pub path: String,
    pub remix_safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl AssetBinding {
    pub fn new(
        id: impl Into<String>,
        kind: BindingKind,
        path: impl Into<String>,
        remix_safe: bool,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            path: path.into(),
            remix_safe,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Path to load; unsafe assets use their fallback in remix mode when one exists
    pub fn resolve_path(&self, remix: bool) -> &str {
        match (&self.fallback, remix && !self.remix_safe) {
            (Some(fallback), true) => fallback,
            _ => &self.path,
        }
    }
}

/// Bindings keyed by id, in binding order
#[derive(Debug, Clone, Default)]
pub struct AssetBindings {
    bindings: OrderedMap<AssetBinding>,
}

impl AssetBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an asset, returning the binding it replaced
    pub fn bind(&mut self, binding: AssetBinding) -> Option<AssetBinding> {
        self.bindings.insert(binding.id.clone(), binding)
    }

    pub fn unbind(&mut self, id: &str) -> Option<AssetBinding> {
        self.bindings.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&AssetBinding> {
        self.bindings.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &AssetBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub(crate) fn restore(&mut self, bindings: Vec<AssetBinding>) {
        self.bindings = bindings.into_iter().map(|b| (b.id.clone(), b)).collect();
    }
}
