//! Theme configuration types

use overlink_lineage::AssetKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Render layer a theme asset or reducer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeLayer {
    Background,
    Foreground,
    Ui,
    Effects,
    Audio,
}

impl ThemeLayer {
    pub const ALL: [ThemeLayer; 5] = [
        Self::Background,
        Self::Foreground,
        Self::Ui,
        Self::Effects,
        Self::Audio,
    ];

    /// Visibility before any toggling
    pub fn visible_by_default(&self) -> bool {
        !matches!(self, Self::Effects)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Foreground => "foreground",
            Self::Ui => "ui",
            Self::Effects => "effects",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for ThemeLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of render operation a theme reducer describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeReducerKind {
    Sprite,
    Ui,
    Effect,
    Shader,
    Audio,
}

impl fmt::Display for ThemeReducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sprite => "sprite",
            Self::Ui => "ui",
            Self::Effect => "effect",
            Self::Shader => "shader",
            Self::Audio => "audio",
        })
    }
}

/// Asset shipped with a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub path: String,
    pub remix_safe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    pub theme_id: String,
    pub layer: ThemeLayer,
    pub priority: i32,
}

/// Render operation contributed by a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDrawReducer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ThemeReducerKind,
    pub priority: i32,
    pub enabled: bool,
    #[serde(default)]
    pub data: serde_json::Value,
    pub theme_id: String,
    pub layer: ThemeLayer,
}

/// Declarative theme bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub layers: Vec<ThemeLayer>,
    #[serde(default)]
    pub assets: Vec<ThemeAsset>,
    #[serde(default)]
    pub draw_reducers: Vec<ThemeDrawReducer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shader_preset: Option<String>,
}

impl ThemeConfig {
    /// Create an empty theme using every layer
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            layers: ThemeLayer::ALL.to_vec(),
            assets: Vec::new(),
            draw_reducers: Vec::new(),
            audio_preset: None,
            shader_preset: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an asset owned by this theme
    #[allow(clippy::too_many_arguments)]
    pub fn with_asset(
        mut self,
        id: &str,
        kind: AssetKind,
        path: &str,
        remix_safe: bool,
        fallback: Option<&str>,
        layer: ThemeLayer,
        priority: i32,
    ) -> Self {
        self.assets.push(ThemeAsset {
            id: id.to_string(),
            kind,
            path: path.to_string(),
            remix_safe,
            fallback: fallback.map(str::to_string),
            theme_id: self.id.clone(),
            layer,
            priority,
        });
        self
    }

    /// Add an enabled draw reducer owned by this theme
    pub fn with_reducer(
        mut self,
        id: &str,
        kind: ThemeReducerKind,
        priority: i32,
        layer: ThemeLayer,
        data: serde_json::Value,
    ) -> Self {
        self.draw_reducers.push(ThemeDrawReducer {
            id: id.to_string(),
            kind,
            priority,
            enabled: true,
            data,
            theme_id: self.id.clone(),
            layer,
        });
        self
    }

    pub fn with_audio_preset(mut self, preset: impl Into<String>) -> Self {
        self.audio_preset = Some(preset.into());
        self
    }

    pub fn with_shader_preset(mut self, preset: impl Into<String>) -> Self {
        self.shader_preset = Some(preset.into());
        self
    }
}
