//! Audio playback state machine

use crate::config::{AudioBinding, AudioBindingsConfig, AudioError};
use crate::fade::{FadeCurve, FadeScheduler, VirtualScheduler, FADE_STEPS};
use crate::state::{
    ActiveAudio, AudioLayer, AudioPhase, GainHandle, LayerSafety, PlaybackState,
    RemixSafetyReport,
};
use overlink_core::OrderedMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

/// Effects volume relative to the ambient volume set by `set_theme_volume`
pub const EFFECTS_VOLUME_RATIO: f32 = 0.6;

const SILENT_ZONE: &str = "silent";

/// Options for [`AudioManager::play_theme_audio`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOptions {
    /// Substitute fallbacks for assets that are not remix-safe
    pub remix: bool,
    /// Caller runs in debug mode
    pub debug: bool,
    /// State of the zone requesting audio; `"silent"` suppresses playback
    pub zone_state: Option<String>,
}

impl PlayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remix(mut self, remix: bool) -> Self {
        self.remix = remix;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_zone_state(mut self, zone_state: impl Into<String>) -> Self {
        self.zone_state = Some(zone_state.into());
        self
    }
}

/// Serializable machine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSnapshot {
    pub config: Option<AudioBindingsConfig>,
    pub playback_state: PlaybackState,
    pub current_audio: OrderedMap<ActiveAudio>,
    pub gain_nodes: OrderedMap<GainHandle>,
}

#[derive(Debug, Clone)]
struct FadeTimer {
    curve: FadeCurve,
    elapsed: Duration,
}

/// Plays, fades and stops the audio layers bound to a theme
pub struct AudioManager {
    config: Option<AudioBindingsConfig>,
    state: PlaybackState,
    current_audio: OrderedMap<ActiveAudio>,
    gains: OrderedMap<GainHandle>,
    fade_timers: OrderedMap<FadeTimer>,
    scheduler: Box<dyn FadeScheduler>,
}

impl AudioManager {
    /// Create a machine with no bindings loaded
    pub fn new() -> Self {
        Self {
            config: None,
            state: PlaybackState::default(),
            current_audio: OrderedMap::new(),
            gains: OrderedMap::new(),
            fade_timers: OrderedMap::new(),
            scheduler: Box::new(VirtualScheduler::new()),
        }
    }

    /// Create a machine with the given bindings loaded
    pub fn with_config(config: AudioBindingsConfig) -> Self {
        let mut manager = Self::new();
        manager.load_config(config);
        manager
    }

    /// Replace the fade-out scheduler
    pub fn with_scheduler(mut self, scheduler: impl FadeScheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    pub fn load_config(&mut self, config: AudioBindingsConfig) {
        log::debug!(
            "Audio bindings loaded for {} themes",
            config.theme_audio_bindings.len()
        );
        self.config = Some(config);
    }

    /// Load bindings from a JSON document; on error the current config is kept
    pub fn load_config_file(&mut self, path: impl AsRef<Path>) -> Result<(), AudioError> {
        let config = AudioBindingsConfig::from_json_file(path)?;
        self.load_config(config);
        Ok(())
    }

    pub fn config(&self) -> Option<&AudioBindingsConfig> {
        self.config.as_ref()
    }

    // ---- playback ----

    /// Start the ambient and effects layers of a theme.
    ///
    /// Anything currently loaded is faded out first. Returns `false` and
    /// bumps the error counter when no config is loaded, the theme has no
    /// bindings or no layer was allowed to play.
    pub fn play_theme_audio(&mut self, theme_id: &str, options: &PlayOptions) -> bool {
        let Some(config) = self.config.as_ref() else {
            log::warn!("Audio config not loaded");
            self.state.error_count += 1;
            return false;
        };
        let Some(bindings) = config.theme(theme_id).cloned() else {
            log::warn!("No audio bindings found for theme: {}", theme_id);
            self.state.error_count += 1;
            return false;
        };
        let debug_audio = config.global_audio_settings.debug_mode_audio;

        if !self.current_audio.is_empty() || self.state.is_playing {
            self.stop_current_audio();
        }

        let allowed = !(options.debug && !debug_audio)
            && options.zone_state.as_deref() != Some(SILENT_ZONE);
        if !allowed {
            log::debug!("Audio for theme '{}' suppressed by options", theme_id);
            self.state.error_count += 1;
            return false;
        }

        self.start_binding(theme_id, &bindings.ambient, AudioLayer::Ambient, options);
        self.start_binding(theme_id, &bindings.effects, AudioLayer::Effects, options);

        self.state.current_theme = Some(theme_id.to_string());
        self.state.last_played = Some(theme_id.to_string());
        self.state.is_playing = true;
        log::info!("Playing theme audio: {}", theme_id);
        true
    }

    fn start_binding(
        &mut self,
        theme_id: &str,
        binding: &AudioBinding,
        layer: AudioLayer,
        options: &PlayOptions,
    ) {
        let audio_id = format!("{}_{}", binding.id, layer);
        let path = binding.resolve_path(options.remix).to_string();
        let used_fallback = path != binding.path;
        if used_fallback {
            log::debug!("Using fallback audio for remix mode: {}", path);
        }

        let initial = if binding.fade_in_ms > 0 { 0.0 } else { binding.volume };
        let mut gain = GainHandle::new(audio_id.clone(), initial);
        gain.apply(self.state.current_volume, self.state.is_muted);
        self.gains.insert(audio_id.clone(), gain);

        if binding.fade_in_ms > 0 {
            self.fade_timers.insert(
                audio_id.clone(),
                FadeTimer {
                    curve: FadeCurve::fade_in(binding.volume, binding.fade_in_ms),
                    elapsed: Duration::ZERO,
                },
            );
            self.state.fade_in_progress = true;
        }

        log::debug!(
            "Playing {} audio: {} (volume: {})",
            layer,
            path,
            binding.volume
        );
        self.current_audio.insert(
            audio_id.clone(),
            ActiveAudio {
                audio_id,
                theme_id: theme_id.to_string(),
                layer,
                binding: binding.clone(),
                path,
                used_fallback,
            },
        );
    }

    /// Advance pending fade-ins by `elapsed`. Paused audio does not fade.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.state.is_playing {
            return;
        }

        let master = self.state.current_volume;
        let muted = self.state.is_muted;
        let mut finished = Vec::new();
        for (audio_id, timer) in self
            .fade_timers
            .iter()
            .map(|(id, t)| (id.to_string(), t.clone()))
            .collect::<Vec<_>>()
        {
            let elapsed = timer.elapsed + elapsed;
            if let Some(gain) = self.gains.get_mut(&audio_id) {
                gain.level = timer.curve.gain_at(elapsed);
                gain.apply(master, muted);
            }
            if timer.curve.is_complete(elapsed) {
                finished.push(audio_id);
            } else if let Some(live) = self.fade_timers.get_mut(&audio_id) {
                live.elapsed = elapsed;
            }
        }

        for audio_id in finished {
            self.fade_timers.remove(&audio_id);
        }
        self.state.fade_in_progress = !self.fade_timers.is_empty();
    }

    /// Fade out and unload every layer, then clear the playback state.
    ///
    /// Each fade-out step waits on the scheduler, so this returns only once
    /// every layer has reached zero gain.
    pub fn stop_current_audio(&mut self) {
        let audio_ids: Vec<String> = self.current_audio.keys().map(str::to_string).collect();
        for audio_id in &audio_ids {
            self.fade_timers.remove(audio_id);

            let fade_out_ms = self
                .current_audio
                .get(audio_id)
                .map(|a| a.binding.fade_out_ms)
                .unwrap_or(0);
            if fade_out_ms > 0 {
                self.run_fade_out(audio_id, fade_out_ms);
            }

            self.current_audio.remove(audio_id);
            self.gains.remove(audio_id);
        }

        if !audio_ids.is_empty() {
            log::info!(
                "Stopped theme audio: {}",
                self.state.current_theme.as_deref().unwrap_or("none")
            );
        }
        self.state.is_playing = false;
        self.state.current_theme = None;
        self.state.fade_in_progress = false;
        self.state.fade_out_progress = false;
    }

    fn run_fade_out(&mut self, audio_id: &str, duration_ms: u64) {
        let Some(start) = self.gains.get(audio_id).map(|g| g.level) else {
            return;
        };
        let curve = FadeCurve::fade_out(start, duration_ms);
        let step = curve.step_duration();
        let master = self.state.current_volume;
        let muted = self.state.is_muted;

        self.state.fade_out_progress = true;
        for n in 1..=FADE_STEPS {
            self.scheduler.wait(step);
            if let Some(gain) = self.gains.get_mut(audio_id) {
                gain.level = curve.gain_at_step(n);
                gain.apply(master, muted);
            }
        }
        self.state.fade_out_progress = false;
    }

    /// Pause playing audio; `false` if nothing was playing
    pub fn pause_audio(&mut self) -> bool {
        if !self.state.is_playing {
            return false;
        }
        for audio_id in self.current_audio.keys() {
            log::debug!("Paused audio: {}", audio_id);
        }
        self.state.is_playing = false;
        true
    }

    /// Resume paused audio; `false` if nothing was paused
    pub fn resume_audio(&mut self) -> bool {
        if self.state.is_playing || self.current_audio.is_empty() {
            return false;
        }
        for audio_id in self.current_audio.keys() {
            log::debug!("Resumed audio: {}", audio_id);
        }
        self.state.is_playing = true;
        true
    }

    // ---- volume ----

    fn reapply_gains(&mut self) {
        let master = self.state.current_volume;
        let muted = self.state.is_muted;
        for gain in self.gains.values_mut() {
            gain.apply(master, muted);
        }
    }

    /// Clamp to [0, 1] and apply to every live gain handle
    pub fn set_master_volume(&mut self, volume: f32) {
        let clamped = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.state.current_volume = clamped;
        self.reapply_gains();
        log::debug!("Master volume set to: {}", clamped);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.state.is_muted = muted;
        self.reapply_gains();
    }

    /// Set a theme's ambient volume and derive its effects volume.
    ///
    /// Live gain handles are updated only when the theme is the current one.
    /// Returns `false` for unknown themes.
    pub fn set_theme_volume(&mut self, theme_id: &str, volume: f32) -> bool {
        let clamped = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        let effects = clamped * EFFECTS_VOLUME_RATIO;

        let Some(bindings) = self.config.as_mut().and_then(|c| c.theme_mut(theme_id)) else {
            return false;
        };
        bindings.ambient.volume = clamped;
        bindings.effects.volume = effects;

        if self.state.current_theme.as_deref() == Some(theme_id) {
            let master = self.state.current_volume;
            let muted = self.state.is_muted;
            for audio in self.current_audio.values_mut() {
                if audio.theme_id != theme_id {
                    continue;
                }
                let level = match audio.layer {
                    AudioLayer::Ambient => clamped,
                    AudioLayer::Effects => effects,
                };
                audio.binding.volume = level;

                match self.fade_timers.get_mut(&audio.audio_id) {
                    Some(timer) => {
                        timer.curve.to = level;
                        if let Some(gain) = self.gains.get_mut(&audio.audio_id) {
                            gain.level = timer.curve.gain_at(timer.elapsed);
                            gain.apply(master, muted);
                        }
                    }
                    None => {
                        if let Some(gain) = self.gains.get_mut(&audio.audio_id) {
                            gain.level = level;
                            gain.apply(master, muted);
                        }
                    }
                }
            }
        }

        log::debug!("Theme {} volume set to: {}", theme_id, clamped);
        true
    }

    // ---- queries ----

    pub fn playback_state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn current_theme(&self) -> Option<&str> {
        self.state.current_theme.as_deref()
    }

    pub fn current_volume(&self) -> f32 {
        self.state.current_volume
    }

    pub fn error_count(&self) -> u32 {
        self.state.error_count
    }

    pub fn phase(&self) -> AudioPhase {
        match (self.state.is_playing, self.current_audio.is_empty()) {
            (true, _) => AudioPhase::Playing,
            (false, false) => AudioPhase::Paused,
            (false, true) => AudioPhase::Stopped,
        }
    }

    pub fn active_audio(&self, audio_id: &str) -> Option<&ActiveAudio> {
        self.current_audio.get(audio_id)
    }

    /// Loaded layers in start order
    pub fn current_audio(&self) -> impl Iterator<Item = &ActiveAudio> {
        self.current_audio.values()
    }

    /// Effective output gain of a live layer
    pub fn gain(&self, audio_id: &str) -> Option<f32> {
        self.gains.get(audio_id).map(|g| g.value)
    }

    pub fn gain_handles(&self) -> impl Iterator<Item = &GainHandle> {
        self.gains.values()
    }

    pub fn pending_fades(&self) -> usize {
        self.fade_timers.len()
    }

    /// Remix safety of a theme's bindings
    pub fn validate_remix_safety(&self, theme_id: &str) -> RemixSafetyReport {
        match self.config.as_ref().and_then(|c| c.theme(theme_id)) {
            Some(bindings) => RemixSafetyReport::new(
                theme_id,
                LayerSafety::of(&bindings.ambient),
                LayerSafety::of(&bindings.effects),
            ),
            None => RemixSafetyReport::new(theme_id, LayerSafety::unknown(), LayerSafety::unknown()),
        }
    }

    /// Plain-text status, optionally describing one theme
    pub fn cli_preview(&self, theme_id: Option<&str>) -> String {
        let Some(config) = self.config.as_ref() else {
            return "Audio config not loaded".to_string();
        };
        let yes_no = |flag: bool| if flag { "Yes" } else { "No" };

        let mut out = String::from("=== Audio Manager Status ===\n");
        let _ = writeln!(out, "Playing: {}", yes_no(self.state.is_playing));
        let _ = writeln!(
            out,
            "Current Theme: {}",
            self.state.current_theme.as_deref().unwrap_or("None")
        );
        let _ = writeln!(out, "Master Volume: {}", self.state.current_volume);
        let _ = writeln!(out, "Muted: {}", yes_no(self.state.is_muted));
        let _ = writeln!(out, "Errors: {}\n", self.state.error_count);

        match theme_id {
            Some(id) => match config.theme(id) {
                Some(bindings) => {
                    let _ = writeln!(out, "=== Theme: {} ===", id);
                    for (label, binding) in [("Ambient", &bindings.ambient), ("Effects", &bindings.effects)] {
                        let _ = writeln!(out, "{}: {}", label, binding.description);
                        let _ = writeln!(out, "  Path: {}", binding.path);
                        let _ = writeln!(out, "  Remix Safe: {}", yes_no(binding.remix_safe));
                        let _ = writeln!(out, "  Volume: {}", binding.volume);
                        let _ = writeln!(out, "  Loop: {}", yes_no(binding.looping));
                    }
                }
                None => {
                    let _ = writeln!(out, "Theme '{}' not found", id);
                }
            },
            None => {
                out.push_str("=== Available Themes ===\n");
                for (id, bindings) in config.theme_audio_bindings.iter() {
                    let _ = writeln!(out, "{}: {}", id, bindings.ambient.description);
                }
            }
        }
        out
    }

    // ---- snapshots ----

    pub fn export_state(&self) -> AudioSnapshot {
        AudioSnapshot {
            config: self.config.clone(),
            playback_state: self.state.clone(),
            current_audio: self.current_audio.clone(),
            gain_nodes: self.gains.clone(),
        }
    }

    /// Restore a snapshot. Pending fades are dropped first.
    pub fn import_state(&mut self, snapshot: AudioSnapshot) {
        self.fade_timers.clear();
        self.config = snapshot.config;
        self.state = snapshot.playback_state;
        self.current_audio = snapshot.current_audio;
        self.gains = snapshot.gain_nodes;
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("state", &self.state)
            .field("current_audio", &self.current_audio.len())
            .field("pending_fades", &self.fade_timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> AudioManager {
        AudioManager::with_config(AudioBindingsConfig::builtin())
    }

    #[test]
    fn test_requires_config() {
        let mut audio = AudioManager::new();
        assert!(!audio.play_theme_audio("neonGrid", &PlayOptions::default()));
        assert_eq!(audio.error_count(), 1);
        assert_eq!(audio.cli_preview(None), "Audio config not loaded");
    }

    #[test]
    fn test_unknown_theme() {
        let mut audio = manager();
        assert!(!audio.play_theme_audio("retroPixel", &PlayOptions::default()));
        assert_eq!(audio.error_count(), 1);
        assert!(!audio.is_playing());
        assert_eq!(audio.phase(), AudioPhase::Stopped);
    }

    #[test]
    fn test_play_starts_both_layers() {
        let mut audio = manager();
        assert!(audio.play_theme_audio("neonGrid", &PlayOptions::default()));

        assert_eq!(audio.current_theme(), Some("neonGrid"));
        assert_eq!(audio.playback_state().last_played.as_deref(), Some("neonGrid"));
        let ids: Vec<&str> = audio.current_audio().map(|a| a.audio_id.as_str()).collect();
        assert_eq!(ids, vec!["neon_ambient_ambient", "neon_effects_effects"]);
        assert!(audio.playback_state().fade_in_progress);
        assert_eq!(audio.gain("neon_ambient_ambient"), Some(0.0));
    }

    #[test]
    fn test_remix_uses_fallback() {
        let mut audio = manager();
        assert!(audio.play_theme_audio("neonGrid", &PlayOptions::new().with_remix(true)));

        let ambient = audio.active_audio("neon_ambient_ambient").unwrap();
        assert_eq!(ambient.path, "assets/themes/fallback/silence.ogg");
        assert!(ambient.used_fallback);
    }

    #[test]
    fn test_silent_zone_suppresses() {
        let mut audio = manager();
        let options = PlayOptions::new().with_zone_state("silent");
        assert!(!audio.play_theme_audio("forestGlade", &options));
        assert_eq!(audio.error_count(), 1);
        assert_eq!(audio.gain_handles().count(), 0);
    }

    #[test]
    fn test_debug_option_respects_global_flag() {
        let mut config = AudioBindingsConfig::builtin();
        config.global_audio_settings.debug_mode_audio = false;
        let mut audio = AudioManager::with_config(config);

        assert!(!audio.play_theme_audio("neonGrid", &PlayOptions::new().with_debug(true)));
        assert!(audio.play_theme_audio("neonGrid", &PlayOptions::new()));
    }

    #[test]
    fn test_fade_in_advances() {
        let mut audio = manager();
        audio.play_theme_audio("neonGrid", &PlayOptions::default());

        audio.advance(Duration::from_millis(1000));
        let gain = audio.gain("neon_ambient_ambient").unwrap();
        assert!((gain - 0.35).abs() < 1e-6);
        // effects fade (500ms) has finished
        assert!((audio.gain("neon_effects_effects").unwrap() - 0.4).abs() < 1e-6);
        assert_eq!(audio.pending_fades(), 1);

        audio.advance(Duration::from_millis(1000));
        assert!((audio.gain("neon_ambient_ambient").unwrap() - 0.7).abs() < 1e-6);
        assert!(!audio.playback_state().fade_in_progress);
    }

    #[test]
    fn test_stop_waits_for_fade_out() {
        let scheduler = VirtualScheduler::new();
        let mut audio = manager().with_scheduler(scheduler.clone());
        audio.play_theme_audio("neonGrid", &PlayOptions::default());
        audio.stop_current_audio();

        // 1500ms ambient + 300ms effects
        assert_eq!(scheduler.total_waited(), Duration::from_millis(1800));
        assert_eq!(scheduler.wait_count(), 2 * FADE_STEPS);
        assert!(!audio.is_playing());
        assert_eq!(audio.current_theme(), None);
        assert!(!audio.playback_state().fade_out_progress);
        assert_eq!(audio.gain_handles().count(), 0);
    }

    #[test]
    fn test_switch_theme_tears_down_previous() {
        let mut audio = manager();
        assert!(audio.play_theme_audio("cosmicVoid", &PlayOptions::default()));
        assert!(audio.play_theme_audio("forestGlade", &PlayOptions::default()));

        assert_eq!(audio.current_theme(), Some("forestGlade"));
        assert!(audio.gain_handles().all(|g| !g.audio_id.starts_with("cosmic")));
        assert_eq!(audio.gain_handles().count(), 2);
    }

    #[test]
    fn test_pause_resume() {
        let mut audio = manager();
        assert!(!audio.pause_audio());
        assert!(!audio.resume_audio());

        audio.play_theme_audio("forestGlade", &PlayOptions::default());
        assert!(audio.pause_audio());
        assert_eq!(audio.phase(), AudioPhase::Paused);

        audio.advance(Duration::from_secs(10));
        assert_eq!(audio.gain("forest_ambient_ambient"), Some(0.0));

        assert!(audio.resume_audio());
        assert_eq!(audio.phase(), AudioPhase::Playing);
    }

    #[test]
    fn test_stop_from_paused() {
        let mut audio = manager();
        audio.play_theme_audio("forestGlade", &PlayOptions::default());
        audio.pause_audio();
        audio.stop_current_audio();
        assert_eq!(audio.phase(), AudioPhase::Stopped);
    }

    #[test]
    fn test_master_volume_clamped() {
        let mut audio = manager();
        for (input, expected) in [(1.5, 1.0), (-0.2, 0.0), (0.25, 0.25), (f32::NAN, 0.0)] {
            audio.set_master_volume(input);
            assert_eq!(audio.current_volume(), expected);
        }
    }

    #[test]
    fn test_master_volume_scales_gains() {
        let mut audio = manager();
        audio.play_theme_audio("neonGrid", &PlayOptions::default());
        audio.advance(Duration::from_secs(5));

        audio.set_master_volume(0.5);
        assert!((audio.gain("neon_ambient_ambient").unwrap() - 0.35).abs() < 1e-6);
        assert!((audio.gain("neon_effects_effects").unwrap() - 0.2).abs() < 1e-6);

        audio.set_muted(true);
        assert_eq!(audio.gain("neon_ambient_ambient"), Some(0.0));
        audio.set_muted(false);
        assert!((audio.gain("neon_ambient_ambient").unwrap() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_theme_volume() {
        let mut audio = manager();
        audio.play_theme_audio("neonGrid", &PlayOptions::default());
        audio.advance(Duration::from_secs(5));

        assert!(audio.set_theme_volume("neonGrid", 0.5));
        assert!((audio.gain("neon_ambient_ambient").unwrap() - 0.5).abs() < 1e-6);
        assert!((audio.gain("neon_effects_effects").unwrap() - 0.3).abs() < 1e-6);

        // not current: config only
        assert!(audio.set_theme_volume("forestGlade", 2.0));
        let forest = audio.config().unwrap().theme("forestGlade").unwrap();
        assert_eq!(forest.ambient.volume, 1.0);
        assert!((audio.gain("neon_ambient_ambient").unwrap() - 0.5).abs() < 1e-6);

        assert!(!audio.set_theme_volume("unknown", 0.5));
    }

    #[test]
    fn test_remix_safety_report() {
        let audio = manager();
        for theme in ["neonGrid", "forestGlade", "cosmicVoid", "unknown"] {
            let report = audio.validate_remix_safety(theme);
            assert_eq!(report.overall, report.ambient.safe && report.effects.safe);
        }

        let cosmic = audio.validate_remix_safety("cosmicVoid");
        assert!(!cosmic.ambient.safe);
        assert!(cosmic.effects.safe);
        assert_eq!(cosmic.effects.license, "CC0");

        let unknown = audio.validate_remix_safety("unknown");
        assert_eq!(unknown.ambient.license, "Unknown");
        assert_eq!(unknown.effects.fallback, "None");
    }

    #[test]
    fn test_cli_preview() {
        let mut audio = manager();
        let status = audio.cli_preview(None);
        assert!(status.contains("Playing: No\n"));
        assert!(status.contains("Master Volume: 1\n"));
        assert!(status.contains("neonGrid: Cyberpunk synth ambient with electric pulses\n"));

        audio.play_theme_audio("cosmicVoid", &PlayOptions::default());
        let theme = audio.cli_preview(Some("cosmicVoid"));
        assert!(theme.contains("Current Theme: cosmicVoid\n"));
        assert!(theme.contains("=== Theme: cosmicVoid ===\n"));
        assert!(theme.contains("  Volume: 0.5\n"));
        assert!(audio.cli_preview(Some("nope")).contains("Theme 'nope' not found\n"));
    }

    #[test]
    fn test_state_round_trip() {
        let mut audio = manager();
        audio.play_theme_audio("neonGrid", &PlayOptions::new().with_remix(true));
        audio.advance(Duration::from_millis(700));
        audio.set_master_volume(0.8);
        audio.play_theme_audio("missing", &PlayOptions::default());

        let snapshot = audio.export_state();
        let json = serde_json::to_string(&snapshot).unwrap();
        let mut restored = AudioManager::new();
        restored.import_state(serde_json::from_str(&json).unwrap());

        assert_eq!(restored.export_state(), snapshot);
        assert_eq!(restored.current_theme(), audio.current_theme());
        assert_eq!(restored.gain("neon_ambient_ambient"), audio.gain("neon_ambient_ambient"));
        assert_eq!(restored.pending_fades(), 0);
    }
}
