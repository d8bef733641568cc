//! Overlink Audio - theme ambient audio
//!
//! Plays an ambient and an effects layer for the active theme, with linear
//! fades, master/theme volume and remix-safe fallback substitution. No audio
//! device is touched; playback is modeled as gain handles so the whole
//! machine can be snapshotted and restored.
//!
//! # Features
//!
//! - Audio bindings document (built-in default or JSON file)
//! - Stopped / playing / paused states with fade-in and fade-out tracking
//! - Fade curves as pure functions of elapsed time
//! - Injectable [`FadeScheduler`] for fade-out suspension points
//! - Remix safety report per theme
//!
//! # Example
//!
//! ```ignore
//! use overlink_audio::prelude::*;
//!
//! let mut audio = AudioManager::with_config(AudioBindingsConfig::builtin());
//! audio.play_theme_audio("neonGrid", &PlayOptions::default().with_remix(true));
//! audio.advance(std::time::Duration::from_millis(500));
//! audio.set_master_volume(0.5);
//! ```

pub mod config;
pub mod fade;
pub mod manager;
pub mod state;

pub mod prelude {
    pub use crate::config::{
        AudioBinding, AudioBindingsConfig, AudioError, FallbackAsset, GlobalAudioSettings,
        ThemeAudioBindings,
    };
    pub use crate::fade::{
        FadeCurve, FadeDirection, FadeScheduler, RealtimeScheduler, VirtualScheduler, FADE_STEPS,
    };
    pub use crate::manager::{AudioManager, AudioSnapshot, PlayOptions, EFFECTS_VOLUME_RATIO};
    pub use crate::state::{
        ActiveAudio, AudioLayer, AudioPhase, GainHandle, LayerSafety, PlaybackState,
        RemixSafetyReport,
    };
}

pub use prelude::*;
