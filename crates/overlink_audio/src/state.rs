//! Playback state and live audio records

use crate::config::AudioBinding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio layer of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioLayer {
    Ambient,
    Effects,
}

impl AudioLayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ambient => "ambient",
            Self::Effects => "effects",
        }
    }
}

impl fmt::Display for AudioLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioPhase {
    Stopped,
    Playing,
    Paused,
}

/// Aggregate playback flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_theme: Option<String>,
    /// Master volume (0.0 - 1.0)
    pub current_volume: f32,
    pub is_muted: bool,
    pub fade_in_progress: bool,
    pub fade_out_progress: bool,
    pub last_played: Option<String>,
    pub error_count: u32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_theme: None,
            current_volume: 1.0,
            is_muted: false,
            fade_in_progress: false,
            fade_out_progress: false,
            last_played: None,
            error_count: 0,
        }
    }
}

/// Gain control for one live audio layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GainHandle {
    pub audio_id: String,
    /// Layer level before master volume, follows fades
    pub level: f32,
    /// Effective output gain
    pub value: f32,
}

impl GainHandle {
    pub fn new(audio_id: impl Into<String>, level: f32) -> Self {
        Self {
            audio_id: audio_id.into(),
            level,
            value: level,
        }
    }

    /// Recompute the output gain from the master volume
    pub fn apply(&mut self, master: f32, muted: bool) {
        self.value = if muted { 0.0 } else { self.level * master };
    }
}

/// Audio layer currently loaded by the machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAudio {
    pub audio_id: String,
    pub theme_id: String,
    pub layer: AudioLayer,
    pub binding: AudioBinding,
    /// Path actually played after remix substitution
    pub path: String,
    pub used_fallback: bool,
}

/// Remix safety of one layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSafety {
    pub safe: bool,
    pub license: String,
    pub fallback: String,
}

impl LayerSafety {
    pub fn unknown() -> Self {
        Self {
            safe: false,
            license: "Unknown".to_string(),
            fallback: "None".to_string(),
        }
    }

    pub fn of(binding: &AudioBinding) -> Self {
        Self {
            safe: binding.remix_safe,
            license: binding.license.clone(),
            fallback: binding.fallback.clone(),
        }
    }
}

/// Remix safety of both layers of a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemixSafetyReport {
    pub theme: String,
    pub ambient: LayerSafety,
    pub effects: LayerSafety,
    pub overall: bool,
}

impl RemixSafetyReport {
    pub fn new(theme: impl Into<String>, ambient: LayerSafety, effects: LayerSafety) -> Self {
        let overall = ambient.safe && effects.safe;
        Self {
            theme: theme.into(),
            ambient,
            effects,
            overall,
        }
    }
}
