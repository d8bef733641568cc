//! Audio bindings document loading

use overlink_audio::prelude::*;

#[test]
fn test_load_bindings_file() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("audioBindings.json");

    let mut config = AudioBindingsConfig::builtin();
    config.theme_audio_bindings.remove("cosmicVoid");
    std::fs::write(&path, serde_json::to_vec_pretty(&config).expect("Should serialize"))
        .expect("Should write config");

    let mut audio = AudioManager::new();
    audio.load_config_file(&path).expect("Should load config");

    assert_eq!(audio.config(), Some(&config));
    assert!(!audio.play_theme_audio("cosmicVoid", &PlayOptions::default()));
    assert!(audio.play_theme_audio("forestGlade", &PlayOptions::default()));
}

#[test]
fn test_missing_file_keeps_previous_config() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let mut audio = AudioManager::with_config(AudioBindingsConfig::builtin());

    let result = audio.load_config_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(AudioError::Io { .. })));
    assert!(audio.config().is_some());
}

#[test]
fn test_minimal_document_uses_default_settings() {
    let json = r#"{
        "themeAudioBindings": {
            "hubTheme": {
                "ambient": {
                    "id": "hub_ambient", "path": "hub.ogg", "fallback": "silence.ogg",
                    "remixSafe": true, "license": "CC0", "volume": 0.5, "loop": true,
                    "fadeIn": 0, "fadeOut": 0
                },
                "effects": {
                    "id": "hub_effects", "path": "hub_fx.wav", "fallback": "silence.ogg",
                    "remixSafe": true, "license": "CC-BY", "volume": 0.2, "loop": false,
                    "fadeInMs": 100, "fadeOutMs": 100
                }
            }
        }
    }"#;

    let config = AudioBindingsConfig::from_json_str(json).expect("Should parse");
    assert_eq!(config.global_audio_settings.fade_in_default, 2000);
    assert_eq!(config.theme("hubTheme").unwrap().effects.fade_in_ms, 100);

    let mut audio = AudioManager::with_config(config);
    assert!(audio.play_theme_audio("hubTheme", &PlayOptions::default()));
    assert_eq!(audio.gain("hub_ambient_ambient"), Some(0.5));
    assert!(audio.validate_remix_safety("hubTheme").overall);
}
