//! Audio bindings document

use overlink_core::OrderedMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const FALLBACK_SILENCE: &str = "assets/themes/fallback/silence.ogg";

/// Audio error types
#[derive(Debug)]
pub enum AudioError {
    /// Failed to read the bindings document
    Io { path: PathBuf, source: std::io::Error },
    /// Bindings document is not valid JSON for [`AudioBindingsConfig`]
    Parse(serde_json::Error),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read audio config {}: {}", path.display(), source)
            }
            Self::Parse(e) => write!(f, "Invalid audio config: {}", e),
        }
    }
}

impl std::error::Error for AudioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
        }
    }
}

/// One playable audio layer of a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBinding {
    pub id: String,
    pub path: String,
    pub fallback: String,
    pub remix_safe: bool,
    pub license: String,
    #[serde(default)]
    pub description: String,
    /// Volume (0.0 - 1.0)
    pub volume: f32,
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Fade-in duration in milliseconds
    #[serde(rename = "fadeIn", alias = "fadeInMs")]
    pub fade_in_ms: u64,
    /// Fade-out duration in milliseconds
    #[serde(rename = "fadeOut", alias = "fadeOutMs")]
    pub fade_out_ms: u64,
    #[serde(default)]
    pub layers: Vec<String>,
}

impl AudioBinding {
    /// Looping CC0 binding with the silence fallback
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            fallback: FALLBACK_SILENCE.to_string(),
            remix_safe: false,
            license: "CC0".to_string(),
            description: String::new(),
            volume: 1.0,
            looping: true,
            fade_in_ms: 0,
            fade_out_ms: 0,
            layers: Vec::new(),
        }
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_fades(mut self, fade_in_ms: u64, fade_out_ms: u64) -> Self {
        self.fade_in_ms = fade_in_ms;
        self.fade_out_ms = fade_out_ms;
        self
    }

    pub fn with_remix_safe(mut self, remix_safe: bool) -> Self {
        self.remix_safe = remix_safe;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_layers(mut self, layers: &[&str]) -> Self {
        self.layers = layers.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Path to play, substituting the fallback for unsafe assets in remix mode
    pub fn resolve_path(&self, remix: bool) -> &str {
        if remix && !self.remix_safe {
            &self.fallback
        } else {
            &self.path
        }
    }
}

/// Ambient and effects layers of one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeAudioBindings {
    pub ambient: AudioBinding,
    pub effects: AudioBinding,
}

/// Settings shared by every theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAudioSettings {
    pub master_volume: f32,
    pub ambient_volume: f32,
    pub effects_volume: f32,
    pub fade_in_default: u64,
    pub fade_out_default: u64,
    pub crossfade_duration: u64,
    pub remix_mode_fallback: String,
    /// Whether audio plays when a caller requests debug mode
    pub debug_mode_audio: bool,
}

impl Default for GlobalAudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            ambient_volume: 0.8,
            effects_volume: 0.6,
            fade_in_default: 2000,
            fade_out_default: 1500,
            crossfade_duration: 1000,
            remix_mode_fallback: "silence".to_string(),
            debug_mode_audio: true,
        }
    }
}

/// Redistributable stand-in audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackAsset {
    pub path: String,
    pub description: String,
    pub remix_safe: bool,
    pub license: String,
}

/// Complete audio bindings document, keyed by theme id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBindingsConfig {
    pub theme_audio_bindings: OrderedMap<ThemeAudioBindings>,
    #[serde(default)]
    pub global_audio_settings: GlobalAudioSettings,
    #[serde(default)]
    pub fallback_assets: OrderedMap<FallbackAsset>,
}

impl AudioBindingsConfig {
    /// Parse a bindings document
    pub fn from_json_str(json: &str) -> Result<Self, AudioError> {
        serde_json::from_str(json).map_err(AudioError::Parse)
    }

    /// Load a bindings document from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AudioError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| AudioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded audio bindings for {} themes from {}",
            config.theme_audio_bindings.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn theme(&self, theme_id: &str) -> Option<&ThemeAudioBindings> {
        self.theme_audio_bindings.get(theme_id)
    }

    pub fn theme_mut(&mut self, theme_id: &str) -> Option<&mut ThemeAudioBindings> {
        self.theme_audio_bindings.get_mut(theme_id)
    }

    /// Bindings for the built-in themes
    pub fn builtin() -> Self {
        let mut themes = OrderedMap::new();
        themes.insert(
            "neonGrid",
            ThemeAudioBindings {
                ambient: AudioBinding::new("neon_ambient", "assets/themes/neon_grid/ambient_synth.ogg")
                    .with_description("Cyberpunk synth ambient with electric pulses")
                    .with_volume(0.7)
                    .with_fades(2000, 1500)
                    .with_layers(&["background", "audio"]),
                effects: AudioBinding::new("neon_effects", "assets/themes/neon_grid/effect_pulses.ogg")
                    .with_description("Neon grid effect pulses and glitches")
                    .with_volume(0.4)
                    .with_fades(500, 300)
                    .with_layers(&["effects", "audio"]),
            },
        );
        themes.insert(
            "forestGlade",
            ThemeAudioBindings {
                ambient: AudioBinding::new(
                    "forest_ambient",
                    "assets/themes/forest_glade/ambient_nature.ogg",
                )
                .with_description("Peaceful forest sounds with birds and wind")
                .with_volume(0.6)
                .with_fades(3000, 2000)
                .with_layers(&["background", "audio"]),
                effects: AudioBinding::new(
                    "forest_effects",
                    "assets/themes/forest_glade/effect_leaves.ogg",
                )
                .with_description("Rustling leaves and gentle nature effects")
                .with_volume(0.3)
                .with_fades(1000, 800)
                .with_layers(&["effects", "audio"]),
            },
        );
        themes.insert(
            "cosmicVoid",
            ThemeAudioBindings {
                ambient: AudioBinding::new(
                    "cosmic_ambient",
                    "assets/themes/cosmic_void/ambient_space.ogg",
                )
                .with_description("Deep space ambient with cosmic drones")
                .with_volume(0.5)
                .with_fades(4000, 3000)
                .with_layers(&["background", "audio"]),
                effects: AudioBinding::new("cosmic_effects", FALLBACK_SILENCE)
                    .with_remix_safe(true)
                    .with_description("Twinkling star effects and cosmic pulses")
                    .with_volume(0.4)
                    .with_fades(1500, 1200)
                    .with_layers(&["effects", "audio"]),
            },
        );

        let mut fallback_assets = OrderedMap::new();
        fallback_assets.insert(
            "silence",
            FallbackAsset {
                path: FALLBACK_SILENCE.to_string(),
                description: "Silent audio file for fallback scenarios".to_string(),
                remix_safe: true,
                license: "CC0".to_string(),
            },
        );
        fallback_assets.insert(
            "whiteNoise",
            FallbackAsset {
                path: "assets/themes/fallback/white_noise.ogg".to_string(),
                description: "Gentle white noise for fallback scenarios".to_string(),
                remix_safe: true,
                license: "CC0".to_string(),
            },
        );

        Self {
            theme_audio_bindings: themes,
            global_audio_settings: GlobalAudioSettings::default(),
            fallback_assets,
        }
    }
}

impl Default for AudioBindingsConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
