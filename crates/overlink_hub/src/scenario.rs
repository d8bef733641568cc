//! Scripted walk through the hub
//!
//! Builds the reference hub (four zones, three modules, four reducers and
//! three bindings), navigates it and reports a per-step timeline plus any
//! consistency issues found at the end.

use crate::bindings::{AssetBinding, BindingKind};
use crate::hub::OverlinkHub;
use crate::modules::ModuleStatus;
use crate::overlay::OverlayLayer;
use crate::reducers::{DrawReducer, ReducerKind};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

const SCENARIO_NAME: &str = "Overlink";
const START_THEME: &str = "neonGrid";

/// Options for [`run_scenario`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Turn on debug mode and the debug renderer before navigating
    pub enable_debug: bool,
    /// Activate the remix preview module and play audio with remix fallbacks
    pub enable_remix_mode: bool,
}

impl ScenarioConfig {
    /// Read `OVERLINK_SCENARIO_DEBUG` / `OVERLINK_SCENARIO_REMIX`
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |var: &str| {
            lookup(var).is_some_and(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
        };
        Self {
            enable_debug: flag("OVERLINK_SCENARIO_DEBUG"),
            enable_remix_mode: flag("OVERLINK_SCENARIO_REMIX"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioStatus {
    Ok,
    Error,
}

/// Hub state after one scripted step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub step: u32,
    pub current_zone: Option<String>,
    pub active_modules: Vec<String>,
    pub overlay_layers: BTreeMap<OverlayLayer, bool>,
    pub draw_reducers: usize,
    pub asset_bindings: usize,
    /// Pending transitions at the end of the step
    pub transitions: usize,
    pub debug_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSummary {
    pub id: String,
    pub status: ModuleStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducerSummary {
    pub id: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BindingKind,
    pub remix_safe: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalState {
    pub current_zone: Option<String>,
    pub active_modules: Vec<ModuleSummary>,
    pub overlay_layers: BTreeMap<OverlayLayer, bool>,
    pub draw_reducers: Vec<ReducerSummary>,
    pub asset_bindings: Vec<BindingSummary>,
    pub debug_mode: bool,
    pub active_theme: Option<String>,
    pub audio_theme: Option<String>,
}

/// Document printed by the `overlink_scenario` binary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutput {
    pub op: &'static str,
    pub status: ScenarioStatus,
    pub name: &'static str,
    pub timeline: Vec<TimelineEntry>,
    pub final_state: FinalState,
    pub issues: Vec<String>,
}

/// Register the reference zones, modules, reducers and bindings
pub fn populate(hub: &mut OverlinkHub) {
    hub.register_zone("hub", Some("Central Hub"), ["meta", "transition"]);
    hub.register_zone("toppler", Some("Toppler Demo"), ["physics", "puzzle"]);
    hub.register_zone("spirit_tamer", Some("Spirit Tamer"), ["rpg", "combat"]);
    hub.register_zone("preview", Some("Remix Preview"), ["meta", "preview"]);

    hub.register_module("toppler_demo", "toppler", Vec::<String>::new());
    hub.register_module("spirit_tamer_demo", "spirit_tamer", Vec::<String>::new());
    hub.register_module("remix_preview", "preview", ["toppler_demo", "spirit_tamer_demo"]);

    hub.add_draw_reducer(
        DrawReducer::new("sprite_renderer", ReducerKind::Sprite, 1)
            .with_data(json!({"batchSize": 100, "textureAtlas": "main"})),
    );
    hub.add_draw_reducer(
        DrawReducer::new("ui_renderer", ReducerKind::Ui, 10)
            .with_data(json!({"theme": "default", "scale": 1.0})),
    );
    hub.add_draw_reducer(
        DrawReducer::new("effect_renderer", ReducerKind::Effect, 5)
            .with_data(json!({"particleCount": 50, "blendMode": "additive"})),
    );
    hub.add_draw_reducer(
        DrawReducer::new("debug_renderer", ReducerKind::Debug, 100)
            .with_enabled(false)
            .with_data(json!({"showFPS": true, "showBounds": false})),
    );

    hub.bind_asset(
        AssetBinding::new("main_textures", BindingKind::Texture, "assets/textures/main.atlas", true)
            .with_fallback("assets/textures/fallback.atlas"),
    );
    hub.bind_asset(
        AssetBinding::new("background_music", BindingKind::Audio, "assets/audio/ambient.ogg", false)
            .with_fallback("assets/audio/silence.ogg"),
    );
    hub.bind_asset(AssetBinding::new(
        "transition_shader",
        BindingKind::Shader,
        "assets/shaders/transition.glsl",
        true,
    ));
}

fn snapshot_step(hub: &OverlinkHub, step: u32) -> TimelineEntry {
    TimelineEntry {
        step,
        current_zone: hub.current_zone().map(str::to_string),
        active_modules: hub.active_modules().to_vec(),
        overlay_layers: hub.overlay_layers().clone(),
        draw_reducers: hub.draw_reducers().len(),
        asset_bindings: hub.asset_bindings().count(),
        transitions: hub.pending_transitions().count(),
        debug_mode: hub.debug_mode(),
    }
}

fn final_state(hub: &OverlinkHub) -> FinalState {
    FinalState {
        current_zone: hub.current_zone().map(str::to_string),
        active_modules: hub
            .modules()
            .filter(|m| m.is_active())
            .map(|m| ModuleSummary {
                id: m.id.clone(),
                status: m.status,
            })
            .collect(),
        overlay_layers: hub.overlay_layers().clone(),
        draw_reducers: hub
            .draw_reducers()
            .iter()
            .map(|r| ReducerSummary {
                id: r.id.clone(),
                enabled: r.enabled,
            })
            .collect(),
        asset_bindings: hub
            .asset_bindings()
            .map(|b| BindingSummary {
                id: b.id.clone(),
                kind: b.kind,
                remix_safe: b.remix_safe,
            })
            .collect(),
        debug_mode: hub.debug_mode(),
        active_theme: hub.active_theme().map(str::to_string),
        audio_theme: hub.audio().current_theme().map(str::to_string),
    }
}

/// Run the scenario on a fresh default hub
pub fn run_scenario(config: ScenarioConfig) -> ScenarioOutput {
    run_scenario_on(OverlinkHub::new(), config)
}

/// Run the scenario on a caller-built hub
pub fn run_scenario_on(mut hub: OverlinkHub, config: ScenarioConfig) -> ScenarioOutput {
    populate(&mut hub);
    let mut issues = Vec::new();

    hub.activate_module("toppler_demo");
    hub.activate_module("spirit_tamer_demo");

    if config.enable_debug {
        hub.toggle_debug_mode();
        hub.toggle_draw_reducer("debug_renderer");
    }
    if config.enable_remix_mode && !hub.activate_module("remix_preview") {
        issues.push("remix_preview could not be activated".to_string());
    }

    if !hub.activate_theme(START_THEME) {
        issues.push(format!("Theme {} is not registered", START_THEME));
    } else if !hub.play_theme_audio(START_THEME, config.enable_remix_mode) {
        issues.push(format!("Audio for {} failed to start", START_THEME));
    }

    let mut timeline = Vec::new();
    let mut step = 0;
    let mut record = |hub: &OverlinkHub| {
        step += 1;
        timeline.push(snapshot_step(hub, step));
    };

    for zone in ["hub", "toppler", "spirit_tamer", "preview"] {
        hub.enter_zone(zone);
        record(&hub);
    }
    hub.toggle_overlay_layer(OverlayLayer::Preview);
    record(&hub);
    hub.toggle_overlay_layer(OverlayLayer::Debug);
    record(&hub);
    let processed = hub.process_transitions();
    log::debug!("Scenario processed {} transitions", processed.len());
    record(&hub);
    hub.enter_zone("hub");
    record(&hub);

    if hub.current_zone() != Some("hub") {
        issues.push("Expected to end in hub zone".to_string());
    }
    if hub.active_modules().len() < 2 {
        issues.push("Expected at least 2 active modules".to_string());
    }
    if hub.draw_reducers().len() != 4 {
        issues.push("Expected 4 draw reducers".to_string());
    }
    if hub.asset_bindings().count() != 3 {
        issues.push("Expected 3 asset bindings".to_string());
    }

    let status = if issues.is_empty() {
        ScenarioStatus::Ok
    } else {
        ScenarioStatus::Error
    };
    for issue in &issues {
        log::warn!("Scenario issue: {}", issue);
    }

    ScenarioOutput {
        op: "scenario",
        status,
        name: SCENARIO_NAME,
        timeline,
        final_state: final_state(&hub),
        issues,
    }
}
