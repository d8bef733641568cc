//! Theme registry

use crate::builtin::default_themes;
use crate::theme::{ThemeAsset, ThemeConfig, ThemeDrawReducer, ThemeLayer};
use overlink_core::OrderedMap;
use overlink_lineage::AssetKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// `{theme}_{local}` with the theme id length up front, so ids containing
/// underscores cannot alias (`a` + `b_c` vs `a_b` + `c`)
fn scoped_key(theme_id: &str, local_id: &str) -> String {
    format!("{}{}", theme_prefix(theme_id), local_id)
}

fn theme_prefix(theme_id: &str) -> String {
    format!("{}:{}_", theme_id.len(), theme_id)
}

/// Everything a theme contributes, resolved against current reducer state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreview {
    pub theme: ThemeConfig,
    pub assets: Vec<ThemeAsset>,
    pub reducers: Vec<ThemeDrawReducer>,
    pub audio_preset: Option<String>,
    pub shader_preset: Option<String>,
}

/// Serializable registry state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSnapshot {
    pub active_theme: Option<String>,
    pub available_themes: OrderedMap<ThemeConfig>,
    pub layer_visibility: BTreeMap<ThemeLayer, bool>,
}

/// Registry of theme bundles and the currently active theme
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    active_theme: Option<String>,
    themes: OrderedMap<ThemeConfig>,
    layer_visibility: BTreeMap<ThemeLayer, bool>,
    /// Assets keyed by [`scoped_key`]
    asset_table: OrderedMap<ThemeAsset>,
    /// Reducers keyed by [`scoped_key`]; holds the live enabled flags
    reducer_table: OrderedMap<ThemeDrawReducer>,
}

impl ThemeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            active_theme: None,
            themes: OrderedMap::new(),
            layer_visibility: ThemeLayer::ALL
                .iter()
                .map(|layer| (*layer, layer.visible_by_default()))
                .collect(),
            asset_table: OrderedMap::new(),
            reducer_table: OrderedMap::new(),
        }
    }

    /// Create a registry holding the built-in themes
    pub fn with_default_themes() -> Self {
        let mut registry = Self::new();
        for theme in default_themes() {
            registry.register_theme(theme);
        }
        registry
    }

    /// Register a theme, replacing any theme with the same id
    pub fn register_theme(&mut self, config: ThemeConfig) {
        if self.themes.contains_key(&config.id) {
            let prefix = theme_prefix(&config.id);
            self.asset_table.retain(|key, asset| {
                !(asset.theme_id == config.id && key.starts_with(&prefix))
            });
            self.reducer_table.retain(|key, reducer| {
                !(reducer.theme_id == config.id && key.starts_with(&prefix))
            });
        }

        for asset in &config.assets {
            self.asset_table
                .insert(scoped_key(&config.id, &asset.id), asset.clone());
        }
        for reducer in &config.draw_reducers {
            self.reducer_table
                .insert(scoped_key(&config.id, &reducer.id), reducer.clone());
        }

        log::debug!(
            "Registered theme '{}' ({} assets, {} reducers)",
            config.id,
            config.assets.len(),
            config.draw_reducers.len()
        );
        self.themes.insert(config.id.clone(), config);
    }

    /// Make a registered theme active; unknown ids leave state unchanged
    pub fn activate_theme(&mut self, theme_id: &str) -> bool {
        if !self.themes.contains_key(theme_id) {
            log::debug!("Cannot activate unknown theme '{}'", theme_id);
            return false;
        }
        self.active_theme = Some(theme_id.to_string());
        true
    }

    pub fn deactivate_theme(&mut self) {
        self.active_theme = None;
    }

    pub fn active_theme(&self) -> Option<&str> {
        self.active_theme.as_deref()
    }

    /// Registered theme ids in registration order
    pub fn available_themes(&self) -> Vec<&str> {
        self.themes.keys().collect()
    }

    pub fn theme_config(&self, theme_id: &str) -> Option<&ThemeConfig> {
        self.themes.get(theme_id)
    }

    pub fn contains(&self, theme_id: &str) -> bool {
        self.themes.contains_key(theme_id)
    }

    // ---- layers ----

    /// Flip a layer's visibility and return the new value
    pub fn toggle_layer(&mut self, layer: ThemeLayer) -> bool {
        let visible = self.layer_visibility.entry(layer).or_insert(false);
        *visible = !*visible;
        *visible
    }

    pub fn set_layer(&mut self, layer: ThemeLayer, visible: bool) {
        self.layer_visibility.insert(layer, visible);
    }

    pub fn is_layer_visible(&self, layer: ThemeLayer) -> bool {
        self.layer_visibility.get(&layer).copied().unwrap_or(false)
    }

    pub fn layer_visibility(&self) -> &BTreeMap<ThemeLayer, bool> {
        &self.layer_visibility
    }

    // ---- assets ----

    pub fn theme_assets(&self, theme_id: &str) -> Vec<ThemeAsset> {
        self.themes
            .get(theme_id)
            .map(|theme| theme.assets.clone())
            .unwrap_or_default()
    }

    /// Assets of every theme with the given kind
    pub fn assets_by_kind(&self, kind: AssetKind) -> Vec<&ThemeAsset> {
        self.asset_table.values().filter(|a| a.kind == kind).collect()
    }

    /// Assets of every theme flagged remix-safe
    pub fn remix_safe_assets(&self) -> Vec<&ThemeAsset> {
        self.asset_table.values().filter(|a| a.remix_safe).collect()
    }

    // ---- reducers ----

    /// A theme's reducers with their current enabled flags
    pub fn theme_reducers(&self, theme_id: &str) -> Vec<ThemeDrawReducer> {
        let Some(theme) = self.themes.get(theme_id) else {
            return Vec::new();
        };
        theme
            .draw_reducers
            .iter()
            .filter_map(|r| self.reducer_table.get(&scoped_key(theme_id, &r.id)))
            .cloned()
            .collect()
    }

    /// Enabled reducers of the active theme whose layer is visible
    pub fn active_theme_reducers(&self) -> Vec<ThemeDrawReducer> {
        let Some(active) = self.active_theme.as_deref() else {
            return Vec::new();
        };
        self.theme_reducers(active)
            .into_iter()
            .filter(|r| r.enabled && self.is_layer_visible(r.layer))
            .collect()
    }

    /// Flip a theme reducer; unknown pairs return `false`
    pub fn toggle_theme_reducer(&mut self, theme_id: &str, reducer_id: &str) -> bool {
        match self.reducer_table.get_mut(&scoped_key(theme_id, reducer_id)) {
            Some(reducer) => {
                reducer.enabled = !reducer.enabled;
                reducer.enabled
            }
            None => false,
        }
    }

    // ---- presets and previews ----

    pub fn audio_preset(&self, theme_id: &str) -> Option<&str> {
        self.themes.get(theme_id)?.audio_preset.as_deref()
    }

    pub fn shader_preset(&self, theme_id: &str) -> Option<&str> {
        self.themes.get(theme_id)?.shader_preset.as_deref()
    }

    pub fn preview_theme(&self, theme_id: &str) -> Option<ThemePreview> {
        let theme = self.themes.get(theme_id)?;
        Some(ThemePreview {
            theme: theme.clone(),
            assets: self.theme_assets(theme_id),
            reducers: self.theme_reducers(theme_id),
            audio_preset: theme.audio_preset.clone(),
            shader_preset: theme.shader_preset.clone(),
        })
    }

    /// Plain-text description of a theme
    pub fn cli_preview(&self, theme_id: &str) -> String {
        let Some(preview) = self.preview_theme(theme_id) else {
            return format!("Theme '{}' not found", theme_id);
        };
        let theme = &preview.theme;
        let layers: Vec<&str> = theme.layers.iter().map(ThemeLayer::as_str).collect();

        let mut out = String::new();
        let _ = writeln!(out, "Theme: {}", theme.name);
        let _ = writeln!(out, "Description: {}", theme.description);
        let _ = writeln!(out, "Layers: {}", layers.join(", "));
        let _ = writeln!(out, "Assets: {}", preview.assets.len());
        let _ = writeln!(out, "Draw Reducers: {}", preview.reducers.len());
        if let Some(preset) = &preview.audio_preset {
            let _ = writeln!(out, "Audio Preset: {}", preset);
        }
        if let Some(preset) = &preview.shader_preset {
            let _ = writeln!(out, "Shader Preset: {}", preset);
        }

        out.push_str("\nAssets:\n");
        for asset in &preview.assets {
            let safety = if asset.remix_safe { "remix-safe" } else { "remix-restricted" };
            let _ = writeln!(out, "  {}: {} ({})", asset.kind, asset.id, safety);
        }

        out.push_str("\nDraw Reducers:\n");
        for reducer in &preview.reducers {
            let _ = writeln!(
                out,
                "  {}: {} (priority: {}, layer: {})",
                reducer.kind, reducer.id, reducer.priority, reducer.layer
            );
        }
        out
    }

    // ---- snapshots ----

    /// Export themes with reducer flags folded back into their configs
    pub fn export_state(&self) -> ThemeSnapshot {
        let available_themes = self
            .themes
            .iter()
            .map(|(id, theme)| {
                let mut theme = theme.clone();
                theme.draw_reducers = self.theme_reducers(id);
                (id, theme)
            })
            .collect();

        ThemeSnapshot {
            active_theme: self.active_theme.clone(),
            available_themes,
            layer_visibility: self.layer_visibility.clone(),
        }
    }

    pub fn import_state(&mut self, snapshot: ThemeSnapshot) {
        self.themes.clear();
        self.asset_table.clear();
        self.reducer_table.clear();
        for theme in snapshot.available_themes.values() {
            self.register_theme(theme.clone());
        }
        self.layer_visibility = snapshot.layer_visibility;
        self.active_theme = snapshot
            .active_theme
            .filter(|id| self.themes.contains_key(id));
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeReducerKind;
    use serde_json::json;

    #[test]
    fn test_default_themes_registered() {
        let themes = ThemeRegistry::with_default_themes();
        assert_eq!(
            themes.available_themes(),
            vec!["neonGrid", "forestGlade", "cosmicVoid"]
        );
        assert_eq!(themes.audio_preset("forestGlade"), Some("forest_ambient"));
        assert_eq!(themes.shader_preset("cosmicVoid"), Some("cosmic_shift"));
        assert_eq!(themes.active_theme(), None);
    }

    #[test]
    fn test_activate_unknown_theme() {
        let mut themes = ThemeRegistry::with_default_themes();
        assert!(themes.activate_theme("neonGrid"));
        assert!(!themes.activate_theme("retroPixel"));
        assert_eq!(themes.active_theme(), Some("neonGrid"));

        themes.deactivate_theme();
        assert!(themes.active_theme_reducers().is_empty());
    }

    #[test]
    fn test_layer_defaults() {
        let themes = ThemeRegistry::new();
        assert!(themes.is_layer_visible(ThemeLayer::Background));
        assert!(themes.is_layer_visible(ThemeLayer::Audio));
        assert!(!themes.is_layer_visible(ThemeLayer::Effects));
    }

    #[test]
    fn test_hidden_layer_excludes_reducers() {
        let mut themes = ThemeRegistry::with_default_themes();
        themes.activate_theme("neonGrid");

        let ids: Vec<String> = themes.active_theme_reducers().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["grid_renderer"]);

        assert!(themes.toggle_layer(ThemeLayer::Effects));
        assert_eq!(themes.active_theme_reducers().len(), 2);

        themes.set_layer(ThemeLayer::Background, false);
        let ids: Vec<String> = themes.active_theme_reducers().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["neon_effects"]);
    }

    #[test]
    fn test_toggle_theme_reducer() {
        let mut themes = ThemeRegistry::with_default_themes();
        themes.activate_theme("forestGlade");

        assert!(!themes.toggle_theme_reducer("forestGlade", "forest_renderer"));
        assert!(themes.active_theme_reducers().is_empty());
        assert!(!themes.toggle_theme_reducer("forestGlade", "missing"));
        assert!(themes.toggle_theme_reducer("forestGlade", "forest_renderer"));
    }

    #[test]
    fn test_flat_asset_queries() {
        let themes = ThemeRegistry::with_default_themes();
        assert_eq!(themes.assets_by_kind(AssetKind::Audio).len(), 3);
        assert_eq!(themes.remix_safe_assets().len(), 6);
    }

    #[test]
    fn test_reregister_replaces_tables() {
        let mut themes = ThemeRegistry::with_default_themes();
        themes.register_theme(
            ThemeConfig::new("neonGrid", "Neon Grid v2").with_reducer(
                "scanlines",
                ThemeReducerKind::Shader,
                2,
                ThemeLayer::Foreground,
                json!({}),
            ),
        );

        assert_eq!(themes.available_themes().len(), 3);
        assert_eq!(themes.theme_reducers("neonGrid").len(), 1);
        assert_eq!(themes.assets_by_kind(AssetKind::Texture).len(), 2);
    }

    #[test]
    fn test_underscored_ids_do_not_alias() {
        let mut themes = ThemeRegistry::new();
        themes.register_theme(ThemeConfig::new("a", "A").with_reducer(
            "b_c",
            ThemeReducerKind::Shader,
            1,
            ThemeLayer::Foreground,
            json!({}),
        ));
        themes.register_theme(ThemeConfig::new("a_b", "AB").with_reducer(
            "c",
            ThemeReducerKind::Shader,
            1,
            ThemeLayer::Foreground,
            json!({}),
        ));

        assert_eq!(themes.theme_reducers("a").len(), 1);
        assert_eq!(themes.theme_reducers("a_b").len(), 1);
        themes.toggle_theme_reducer("a_b", "c");
        assert!(themes.theme_reducers("a")[0].enabled);
        assert!(!themes.theme_reducers("a_b")[0].enabled);
    }

    #[test]
    fn test_cli_preview() {
        let themes = ThemeRegistry::with_default_themes();
        let preview = themes.cli_preview("neonGrid");

        assert!(preview.starts_with("Theme: Neon Grid\n"));
        assert!(preview.contains("Layers: background, foreground, ui, effects, audio\n"));
        assert!(preview.contains("Audio Preset: neon_synth\n"));
        assert!(preview.contains("  audio: synth_audio (remix-restricted)\n"));
        assert!(preview.contains("  effect: neon_effects (priority: 5, layer: effects)\n"));
        assert_eq!(themes.cli_preview("nope"), "Theme 'nope' not found");
    }

    #[test]
    fn test_state_round_trip() {
        let mut themes = ThemeRegistry::with_default_themes();
        themes.activate_theme("cosmicVoid");
        themes.toggle_layer(ThemeLayer::Effects);
        themes.toggle_theme_reducer("cosmicVoid", "starfield_renderer");

        let snapshot = themes.export_state();
        let json = serde_json::to_string(&snapshot).unwrap();
        let mut restored = ThemeRegistry::new();
        restored.import_state(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.export_state(), snapshot);
        assert_eq!(restored.active_theme_reducers(), themes.active_theme_reducers());
    }
}
