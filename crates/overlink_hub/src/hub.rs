//! The Overlink hub facade
//!
//! [`OverlinkHub`] owns every registry and is the only place that mutates
//! them. Collaborators talk to it through id-keyed commands and queries and
//! observe changes through the event bus.

use crate::bindings::{AssetBinding, AssetBindings};
use crate::config::HubConfig;
use crate::credits::{Contributor, CreditRecord, CreditsProvider, PlainCredits};
use crate::error::HubResult;
use crate::events::{
    AssetValidated, AudioEvent, DebugModeChanged, ModuleStatusChanged, OverlayChanged,
    StateImported, ThemeChanged, TransitionsProcessed, ZoneEntered,
};
use crate::modules::{ModuleConnection, ModuleGraph, ModuleStatus};
use crate::navigation::{TransitionConfig, Zone, ZoneNavigator};
use crate::overlay::{OverlayLayer, OverlayLayerSet};
use crate::reducers::{DrawReducer, DrawReducerPipeline};
use crate::snapshot::HubSnapshot;
use overlink_audio::{
    AudioBindingsConfig, AudioManager, FadeScheduler, PlayOptions, RemixSafetyReport,
};
use overlink_core::{SharedClock, SystemClock};
use overlink_event::{Event, EventBus, SubscriberId};
use overlink_lineage::{
    AssetLineage, AssetLineageRegistry, RemixMetadata, RemixOrigin, SamplerSummary,
    ValidationHook, ValidationStatus, ValidationSummary,
};
use overlink_theme::{ThemeConfig, ThemeDrawReducer, ThemeLayer, ThemeRegistry};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`OverlinkHub`] with injectable collaborators
pub struct HubBuilder {
    config: HubConfig,
    clock: SharedClock,
    audio: AudioManager,
    audio_config: Option<AudioBindingsConfig>,
    themes: ThemeRegistry,
    credits: Box<dyn CreditsProvider>,
}

impl HubBuilder {
    pub fn new() -> Self {
        Self {
            config: HubConfig::default(),
            clock: Arc::new(SystemClock),
            audio: AudioManager::new(),
            audio_config: None,
            themes: ThemeRegistry::with_default_themes(),
            credits: Box::new(PlainCredits),
        }
    }

    pub fn with_config(mut self, config: HubConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock used for lineage timestamps and the audit trail
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Scheduler that paces audio fade-outs
    pub fn with_fade_scheduler(mut self, scheduler: impl FadeScheduler + 'static) -> Self {
        self.audio = self.audio.with_scheduler(scheduler);
        self
    }

    /// Use these audio bindings instead of the configured file or the built-in set
    pub fn with_audio_config(mut self, config: AudioBindingsConfig) -> Self {
        self.audio_config = Some(config);
        self
    }

    pub fn with_theme(mut self, theme: ThemeConfig) -> Self {
        self.themes.register_theme(theme);
        self
    }

    /// Start from an empty theme registry
    pub fn without_default_themes(mut self) -> Self {
        self.themes = ThemeRegistry::new();
        self
    }

    pub fn with_credits_provider(mut self, provider: impl CreditsProvider + 'static) -> Self {
        self.credits = Box::new(provider);
        self
    }

    /// Build the hub, reading the audio bindings file named by the config if
    /// no bindings were supplied directly
    pub fn build(mut self) -> HubResult<OverlinkHub> {
        let audio_config = match (self.audio_config.take(), &self.config.audio_config) {
            (Some(config), _) => config,
            (None, Some(path)) => {
                log::info!("Loading audio bindings from {}", path.display());
                AudioBindingsConfig::from_json_file(path)?
            }
            (None, None) => AudioBindingsConfig::builtin(),
        };
        Ok(self.assemble(audio_config))
    }

    fn assemble(self, audio_config: AudioBindingsConfig) -> OverlinkHub {
        let Self {
            config,
            clock,
            mut audio,
            themes,
            credits,
            ..
        } = self;

        audio.load_config(audio_config);
        let lineage = AssetLineageRegistry::with_clock(config.metadata_path.clone(), clock)
            .with_audit_capacity(config.audit_capacity);

        let mut overlays = OverlayLayerSet::new();
        if config.debug_mode {
            overlays.toggle_debug_mode();
        }

        log::debug!(
            "Overlink hub ready ({} themes, metadata at {})",
            themes.available_themes().len(),
            config.metadata_path.display()
        );

        OverlinkHub {
            navigator: ZoneNavigator::new(config.default_transition, config.transition_duration_ms),
            modules: ModuleGraph::new(),
            reducers: DrawReducerPipeline::new(),
            overlays,
            bindings: AssetBindings::new(),
            themes,
            lineage,
            audio,
            credits,
            events: EventBus::new(),
            lineage_tracking: config.lineage_tracking,
            config,
        }
    }
}

impl Default for HubBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Composes zones, modules, reducers, themes, lineage and audio into one
/// navigable experience
pub struct OverlinkHub {
    config: HubConfig,
    navigator: ZoneNavigator,
    modules: ModuleGraph,
    reducers: DrawReducerPipeline,
    overlays: OverlayLayerSet,
    bindings: AssetBindings,
    themes: ThemeRegistry,
    lineage: AssetLineageRegistry,
    audio: AudioManager,
    credits: Box<dyn CreditsProvider>,
    events: EventBus,
    lineage_tracking: bool,
}

impl OverlinkHub {
    /// Hub with default config, built-in themes and built-in audio bindings
    pub fn new() -> Self {
        HubBuilder::new().assemble(AudioBindingsConfig::builtin())
    }

    pub fn builder() -> HubBuilder {
        HubBuilder::new()
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    // ---- events ----

    /// Only events published after subscribing are queued; types with no
    /// subscriber are dropped on publish
    pub fn subscribe<E, F>(&mut self, handler: F) -> SubscriberId
    where
        E: Event,
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Deliver queued events to subscribers
    pub fn process_events(&mut self) -> usize {
        self.events.process()
    }

    pub fn pending_events(&self) -> usize {
        self.events.pending_count()
    }

    // ---- zones & transitions ----

    pub fn register_zone<I, S>(&mut self, id: &str, display_name: Option<&str>, tags: I) -> Zone
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.navigator.register_zone(id, display_name, tags)
    }

    /// Enter a zone; returns `false` if it was already current
    pub fn enter_zone(&mut self, id: &str) -> bool {
        if !self.navigator.enter_zone(id) {
            return false;
        }
        log::info!("Entered zone {}", id);
        self.events.publish(ZoneEntered {
            from: self.navigator.previous_zone().map(str::to_string),
            to: id.to_string(),
        });
        true
    }

    pub fn current_zone(&self) -> Option<&str> {
        self.navigator.current_zone()
    }

    pub fn previous_zone(&self) -> Option<&str> {
        self.navigator.previous_zone()
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.navigator.zone(id)
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.navigator.zones()
    }

    pub fn queue_transition(&mut self, transition: TransitionConfig) {
        self.navigator.queue_transition(transition);
    }

    /// Drain the transition queue
    pub fn process_transitions(&mut self) -> Vec<TransitionConfig> {
        let transitions = self.navigator.process_transitions();
        if !transitions.is_empty() {
            self.events.publish(TransitionsProcessed {
                transitions: transitions.clone(),
            });
        }
        transitions
    }

    pub fn pending_transitions(&self) -> impl Iterator<Item = &TransitionConfig> {
        self.navigator.pending_transitions()
    }

    // ---- modules ----

    pub fn register_module<I, S>(
        &mut self,
        id: impl Into<String>,
        zone_id: impl Into<String>,
        dependencies: I,
    ) -> ModuleConnection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.register(id, zone_id, dependencies)
    }

    /// Activate a module whose dependencies are all active
    pub fn activate_module(&mut self, id: &str) -> bool {
        if !self.modules.activate(id) {
            return false;
        }
        log::info!("Module {} activated", id);
        self.publish_module_status(id, ModuleStatus::Active);
        true
    }

    pub fn deactivate_module(&mut self, id: &str) -> bool {
        if !self.modules.deactivate(id) {
            return false;
        }
        log::info!("Module {} deactivated", id);
        self.publish_module_status(id, ModuleStatus::Inactive);
        true
    }

    fn publish_module_status(&self, id: &str, status: ModuleStatus) {
        self.events.publish(ModuleStatusChanged {
            module_id: id.to_string(),
            status,
            active_modules: self.modules.active_modules().to_vec(),
        });
    }

    pub fn module(&self, id: &str) -> Option<&ModuleConnection> {
        self.modules.get(id)
    }

    pub fn module_status(&self, id: &str) -> Option<ModuleStatus> {
        self.modules.status(id)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleConnection> {
        self.modules.modules()
    }

    pub fn active_modules(&self) -> &[String] {
        self.modules.active_modules()
    }

    // ---- draw reducers ----

    pub fn add_draw_reducer(&mut self, reducer: DrawReducer) {
        self.reducers.add(reducer);
    }

    pub fn remove_draw_reducer(&mut self, id: &str) -> bool {
        self.reducers.remove(id)
    }

    pub fn toggle_draw_reducer(&mut self, id: &str) -> bool {
        self.reducers.toggle(id)
    }

    pub fn draw_reducer(&self, id: &str) -> Option<&DrawReducer> {
        self.reducers.get(id)
    }

    /// Enabled reducers in draw order
    pub fn visible_draw_reducers(&self) -> Vec<&DrawReducer> {
        self.reducers.visible()
    }

    pub fn draw_reducers(&self) -> &[DrawReducer] {
        self.reducers.all()
    }

    // ---- overlays & debug ----

    pub fn toggle_overlay_layer(&mut self, layer: OverlayLayer) -> bool {
        let visible = self.overlays.toggle(layer);
        self.events.publish(OverlayChanged { layer, visible });
        visible
    }

    pub fn set_overlay_layer(&mut self, layer: OverlayLayer, visible: bool) {
        self.overlays.set(layer, visible);
        self.events.publish(OverlayChanged { layer, visible });
    }

    pub fn is_overlay_visible(&self, layer: OverlayLayer) -> bool {
        self.overlays.is_visible(layer)
    }

    pub fn overlay_layers(&self) -> &BTreeMap<OverlayLayer, bool> {
        self.overlays.layers()
    }

    pub fn toggle_debug_mode(&mut self) -> bool {
        let enabled = self.overlays.toggle_debug_mode();
        log::info!("Debug mode {}", if enabled { "enabled" } else { "disabled" });
        self.events.publish(DebugModeChanged { enabled });
        enabled
    }

    pub fn debug_mode(&self) -> bool {
        self.overlays.debug_mode()
    }

    // ---- asset bindings ----

    pub fn bind_asset(&mut self, binding: AssetBinding) -> Option<AssetBinding> {
        self.bindings.bind(binding)
    }

    pub fn unbind_asset(&mut self, id: &str) -> bool {
        self.bindings.unbind(id).is_some()
    }

    pub fn asset_binding(&self, id: &str) -> Option<&AssetBinding> {
        self.bindings.get(id)
    }

    pub fn asset_bindings(&self) -> impl Iterator<Item = &AssetBinding> {
        self.bindings.all()
    }

    /// Path a zone should load for a binding
    pub fn resolve_asset_path(&self, id: &str, remix: bool) -> Option<&str> {
        self.bindings.get(id).map(|b| b.resolve_path(remix))
    }

    // ---- themes ----

    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn register_theme(&mut self, theme: ThemeConfig) {
        self.themes.register_theme(theme);
    }

    pub fn activate_theme(&mut self, theme_id: &str) -> bool {
        if !self.themes.activate_theme(theme_id) {
            log::warn!("Theme not found: {}", theme_id);
            return false;
        }
        log::info!("Theme activated: {}", theme_id);
        self.events.publish(ThemeChanged {
            theme_id: Some(theme_id.to_string()),
            audio_preset: self.themes.audio_preset(theme_id).map(str::to_string),
        });
        true
    }

    pub fn deactivate_theme(&mut self) {
        if self.themes.active_theme().is_none() {
            return;
        }
        self.themes.deactivate_theme();
        self.events.publish(ThemeChanged {
            theme_id: None,
            audio_preset: None,
        });
    }

    pub fn active_theme(&self) -> Option<&str> {
        self.themes.active_theme()
    }

    pub fn toggle_theme_layer(&mut self, layer: ThemeLayer) -> bool {
        self.themes.toggle_layer(layer)
    }

    pub fn toggle_theme_reducer(&mut self, theme_id: &str, reducer_id: &str) -> bool {
        self.themes.toggle_theme_reducer(theme_id, reducer_id)
    }

    pub fn active_theme_reducers(&self) -> Vec<ThemeDrawReducer> {
        self.themes.active_theme_reducers()
    }

    pub fn theme_preview(&self, theme_id: &str) -> String {
        self.themes.cli_preview(theme_id)
    }

    // ---- audio ----

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    /// Play a theme's audio using the hub's debug mode
    pub fn play_theme_audio(&mut self, theme_id: &str, remix: bool) -> bool {
        let options = PlayOptions::new()
            .with_remix(remix)
            .with_debug(self.debug_mode());
        self.play_theme_audio_with(theme_id, &options)
    }

    pub fn play_theme_audio_with(&mut self, theme_id: &str, options: &PlayOptions) -> bool {
        let started = self.audio.play_theme_audio(theme_id, options);
        let event = if started {
            AudioEvent::Started {
                theme_id: theme_id.to_string(),
            }
        } else {
            AudioEvent::Failed {
                theme_id: theme_id.to_string(),
                error_count: self.audio.error_count(),
            }
        };
        self.events.publish(event);
        started
    }

    /// Fade out and stop whatever is playing
    pub fn stop_audio(&mut self) {
        if self.audio.current_theme().is_none() && !self.audio.is_playing() {
            return;
        }
        self.audio.stop_current_audio();
        self.events.publish(AudioEvent::Stopped);
    }

    pub fn pause_audio(&mut self) -> bool {
        self.audio.pause_audio()
    }

    pub fn resume_audio(&mut self) -> bool {
        self.audio.resume_audio()
    }

    /// Advance fade-ins
    pub fn advance_audio(&mut self, elapsed: Duration) {
        self.audio.advance(elapsed);
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.audio.set_master_volume(volume);
    }

    pub fn set_audio_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    pub fn set_theme_volume(&mut self, theme_id: &str, volume: f32) -> bool {
        self.audio.set_theme_volume(theme_id, volume)
    }

    pub fn validate_audio_remix_safety(&self, theme_id: &str) -> RemixSafetyReport {
        self.audio.validate_remix_safety(theme_id)
    }

    pub fn audio_preview(&self, theme_id: Option<&str>) -> String {
        self.audio.cli_preview(theme_id)
    }

    // ---- lineage ----

    pub fn lineage(&self) -> &AssetLineageRegistry {
        &self.lineage
    }

    pub fn lineage_tracking(&self) -> bool {
        self.lineage_tracking
    }

    /// Recorded in snapshots; registration is not affected
    pub fn set_lineage_tracking(&mut self, enabled: bool) {
        self.lineage_tracking = enabled;
    }

    pub fn register_remix_origin(&mut self, origin: RemixOrigin) {
        self.lineage.register_remix_origin(origin);
    }

    pub fn register_contributor(&mut self, id: impl Into<String>, role: impl Into<String>) {
        self.lineage.register_contributor(id, role);
    }

    pub fn register_asset_lineage(&mut self, lineage: AssetLineage) {
        self.lineage.register_asset_lineage(lineage);
    }

    pub fn add_validation_hook(&mut self, hook: ValidationHook) {
        self.lineage.add_validation_hook(hook);
    }

    pub fn remove_validation_hook(&mut self, id: &str) -> bool {
        self.lineage.remove_validation_hook(id)
    }

    pub fn toggle_validation_hook(&mut self, id: &str) -> bool {
        self.lineage.toggle_validation_hook(id)
    }

    /// Validate one asset; unknown ids return `false` without an event
    pub fn validate_asset(&mut self, asset_id: &str) -> bool {
        if self.lineage.asset_lineage(asset_id).is_none() {
            return false;
        }
        let valid = self.lineage.validate_asset(asset_id);
        self.events.publish(AssetValidated {
            asset_id: asset_id.to_string(),
            valid,
        });
        valid
    }

    pub fn validate_all_assets(&mut self) -> ValidationSummary {
        let ids: Vec<String> = self
            .lineage
            .asset_lineages()
            .map(|a| a.asset_id.clone())
            .collect();
        let summary = self.lineage.validate_all_assets();
        for asset_id in ids {
            let valid = self
                .lineage
                .asset_lineage(&asset_id)
                .is_some_and(|a| a.validation_status == ValidationStatus::Validated);
            self.events.publish(AssetValidated { asset_id, valid });
        }
        summary
    }

    pub fn lineage_summary(&mut self) -> String {
        self.lineage.cli_summary()
    }

    pub fn sampler_summary(&mut self) -> SamplerSummary {
        self.lineage.sampler_summary()
    }

    pub fn export_metadata(&mut self) -> Option<RemixMetadata> {
        self.lineage.export_metadata()
    }

    pub fn save_metadata(&mut self) -> HubResult<()> {
        Ok(self.lineage.save_metadata()?)
    }

    /// Load the metadata document; `Ok(false)` when there is no file yet
    pub fn load_metadata(&mut self) -> HubResult<bool> {
        Ok(self.lineage.load_metadata()?)
    }

    // ---- credits ----

    /// Credits for every registered contributor, in registration order
    pub fn credits(&self) -> Vec<CreditRecord> {
        let contributors: Vec<Contributor<'_>> = self
            .lineage
            .contributors()
            .map(|(id, role)| Contributor { id, role })
            .collect();
        self.credits.credits(&contributors)
    }

    // ---- snapshots ----

    pub fn export_state(&self) -> HubSnapshot {
        let (zones, transitions) = self.navigator.export();
        HubSnapshot {
            current_zone: self.navigator.current_zone().map(str::to_string),
            previous_zone: self.navigator.previous_zone().map(str::to_string),
            zones,
            modules: self.modules.export(),
            active_modules: self.modules.active_modules().to_vec(),
            overlay_layers: self.overlays.layers().clone(),
            debug_mode: self.overlays.debug_mode(),
            draw_reducers: self.reducers.all().to_vec(),
            asset_bindings: self.bindings.all().cloned().collect(),
            transitions,
            active_theme: self.themes.active_theme().map(str::to_string),
            lineage_tracking: self.lineage_tracking,
            themes: self.themes.export_state(),
            lineage: self.lineage.export_state(),
            audio: self.audio.export_state(),
        }
    }

    /// Replace all hub state from a snapshot.
    ///
    /// The active module list is recomputed from module statuses and the
    /// top-level `activeTheme` wins over the one inside the theme registry.
    pub fn import_state(&mut self, snapshot: HubSnapshot) {
        let HubSnapshot {
            current_zone,
            previous_zone,
            zones,
            modules,
            active_modules: _,
            overlay_layers,
            debug_mode,
            draw_reducers,
            asset_bindings,
            transitions,
            active_theme,
            lineage_tracking,
            themes,
            lineage,
            audio,
        } = snapshot;

        self.navigator.restore(zones, current_zone, previous_zone, transitions);
        self.modules.restore(modules);
        self.reducers.restore(draw_reducers);
        self.overlays.restore(overlay_layers, debug_mode);
        self.bindings.restore(asset_bindings);

        self.themes.import_state(themes);
        match active_theme.as_deref() {
            Some(id) => {
                if !self.themes.activate_theme(id) {
                    log::warn!("Snapshot names unknown theme {}", id);
                }
            }
            None => self.themes.deactivate_theme(),
        }

        self.lineage.import_state(lineage);
        self.audio.import_state(audio);
        self.lineage_tracking = lineage_tracking;

        log::info!("Hub state imported");
        self.events.publish(StateImported);
    }
}

impl Default for OverlinkHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OverlinkHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlinkHub")
            .field("current_zone", &self.navigator.current_zone())
            .field("modules", &self.modules.len())
            .field("active_modules", &self.modules.active_modules())
            .field("draw_reducers", &self.reducers.len())
            .field("asset_bindings", &self.bindings.len())
            .field("active_theme", &self.themes.active_theme())
            .field("debug_mode", &self.overlays.debug_mode())
            .field("audio", &self.audio)
            .field("events", &self.events)
            .finish()
    }
}
