//! Built-in themes

use crate::theme::{ThemeConfig, ThemeLayer, ThemeReducerKind};
use overlink_lineage::AssetKind;
use serde_json::json;

/// `neonGrid`, `forestGlade` and `cosmicVoid`, in that order
pub fn default_themes() -> Vec<ThemeConfig> {
    vec![neon_grid(), forest_glade(), cosmic_void()]
}

fn neon_grid() -> ThemeConfig {
    ThemeConfig::new("neonGrid", "Neon Grid")
        .with_description("Cyberpunk-inspired neon grid with electric blue and pink accents")
        .with_asset(
            "grid_texture",
            AssetKind::Texture,
            "assets/themes/neon_grid/grid.png",
            true,
            Some("assets/themes/fallback/grid.png"),
            ThemeLayer::Background,
            1,
        )
        .with_asset(
            "neon_shader",
            AssetKind::Shader,
            "assets/themes/neon_grid/neon.glsl",
            true,
            None,
            ThemeLayer::Effects,
            5,
        )
        .with_asset(
            "synth_audio",
            AssetKind::Audio,
            "assets/themes/neon_grid/synth.ogg",
            false,
            Some("assets/themes/fallback/silence.ogg"),
            ThemeLayer::Audio,
            10,
        )
        .with_reducer(
            "grid_renderer",
            ThemeReducerKind::Sprite,
            1,
            ThemeLayer::Background,
            json!({ "gridSize": 32, "neonColor": "#00ffff" }),
        )
        .with_reducer(
            "neon_effects",
            ThemeReducerKind::Effect,
            5,
            ThemeLayer::Effects,
            json!({ "glowIntensity": 0.8, "pulseSpeed": 2.0 }),
        )
        .with_audio_preset("neon_synth")
        .with_shader_preset("neon_glow")
}

fn forest_glade() -> ThemeConfig {
    ThemeConfig::new("forestGlade", "Forest Glade")
        .with_description("Peaceful forest environment with natural greens and earth tones")
        .with_asset(
            "forest_texture",
            AssetKind::Texture,
            "assets/themes/forest_glade/forest.png",
            true,
            Some("assets/themes/fallback/forest.png"),
            ThemeLayer::Background,
            1,
        )
        .with_asset(
            "nature_shader",
            AssetKind::Shader,
            "assets/themes/forest_glade/nature.glsl",
            true,
            None,
            ThemeLayer::Effects,
            3,
        )
        .with_asset(
            "ambient_audio",
            AssetKind::Audio,
            "assets/themes/forest_glade/ambient.ogg",
            false,
            Some("assets/themes/fallback/silence.ogg"),
            ThemeLayer::Audio,
            8,
        )
        .with_reducer(
            "forest_renderer",
            ThemeReducerKind::Sprite,
            1,
            ThemeLayer::Background,
            json!({ "treeDensity": 0.7, "leafColor": "#228b22" }),
        )
        .with_reducer(
            "particle_effects",
            ThemeReducerKind::Effect,
            3,
            ThemeLayer::Effects,
            json!({ "particleCount": 100, "windSpeed": 0.5 }),
        )
        .with_audio_preset("forest_ambient")
        .with_shader_preset("nature_soft")
}

fn cosmic_void() -> ThemeConfig {
    ThemeConfig::new("cosmicVoid", "Cosmic Void")
        .with_description("Deep space environment with stars, nebulae, and cosmic effects")
        .with_asset(
            "space_texture",
            AssetKind::Texture,
            "assets/themes/cosmic_void/space.png",
            true,
            Some("assets/themes/fallback/space.png"),
            ThemeLayer::Background,
            1,
        )
        .with_asset(
            "cosmic_shader",
            AssetKind::Shader,
            "assets/themes/cosmic_void/cosmic.glsl",
            true,
            None,
            ThemeLayer::Effects,
            7,
        )
        .with_asset(
            "space_audio",
            AssetKind::Audio,
            "assets/themes/cosmic_void/space.ogg",
            false,
            Some("assets/themes/fallback/silence.ogg"),
            ThemeLayer::Audio,
            6,
        )
        .with_reducer(
            "starfield_renderer",
            ThemeReducerKind::Sprite,
            1,
            ThemeLayer::Background,
            json!({ "starCount": 500, "twinkleSpeed": 1.5 }),
        )
        .with_reducer(
            "nebula_effects",
            ThemeReducerKind::Effect,
            7,
            ThemeLayer::Effects,
            json!({ "nebulaDensity": 0.3, "colorShift": true }),
        )
        .with_audio_preset("cosmic_ambient")
        .with_shader_preset("cosmic_shift")
}
