//! Hub configuration
//!
//! Configuration sources, later ones win:
//!
//! 1. Built-in defaults
//! 2. Config file: `overlink.json` or `config/overlink.json`
//! 3. Environment variables:
//!    - `OVERLINK_METADATA_PATH=remix/meta.json`
//!    - `OVERLINK_DEBUG` (set to anything to start in debug mode)
//!    - `OVERLINK_AUDIT_CAPACITY=250`
//!    - `OVERLINK_AUDIO_CONFIG=assets/audio_bindings.json`
//!
//! # Example Config File
//!
//! ```json
//! {
//!   "metadataPath": "remix_meta.json",
//!   "auditCapacity": 100,
//!   "debugMode": false,
//!   "defaultTransition": "fade",
//!   "transitionDurationMs": 300,
//!   "lineageTracking": true
//! }
//! ```

use crate::error::ConfigError;
use crate::navigation::TransitionKind;
use overlink_core::DEFAULT_AUDIT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_CANDIDATES: [&str; 2] = ["overlink.json", "config/overlink.json"];

/// Hub-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HubConfig {
    /// Where the remix metadata document is loaded from and saved to
    pub metadata_path: PathBuf,
    /// Capacity of the lineage audit trail
    pub audit_capacity: usize,
    /// Start with debug mode (and the debug overlay) enabled
    pub debug_mode: bool,
    /// Audio bindings document; the built-in bindings are used when unset
    pub audio_config: Option<PathBuf>,
    pub default_transition: TransitionKind,
    pub transition_duration_ms: u64,
    pub lineage_tracking: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from("remix_meta.json"),
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
            debug_mode: false,
            audio_config: None,
            default_transition: TransitionKind::Fade,
            transition_duration_ms: 300,
            lineage_tracking: true,
        }
    }
}

impl HubConfig {
    /// Load configuration from the first config file found, then the environment.
    ///
    /// A malformed file is reported and skipped rather than aborting startup.
    pub fn load() -> Self {
        let mut config = Self::default();

        for path in CONFIG_CANDIDATES {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_json_file(path) {
                Ok(loaded) => {
                    log::info!("Loaded hub config from {}", path);
                    config = loaded;
                    break;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path, e),
            }
        }

        if let Err(e) = config.apply_env_overrides(|var| std::env::var(var).ok()) {
            log::warn!("{}", e);
        }
        config
    }

    /// Read a config document
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `OVERLINK_*` overrides read through `lookup`.
    ///
    /// Every recognised variable is applied before the first invalid one is
    /// reported.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut invalid = None;

        if let Some(path) = lookup("OVERLINK_METADATA_PATH") {
            self.metadata_path = PathBuf::from(path);
        }
        if lookup("OVERLINK_DEBUG").is_some() {
            self.debug_mode = true;
        }
        if let Some(value) = lookup("OVERLINK_AUDIT_CAPACITY") {
            match value.trim().parse::<usize>() {
                Ok(capacity) => self.audit_capacity = capacity,
                Err(_) => {
                    invalid = Some(ConfigError::InvalidEnv {
                        var: "OVERLINK_AUDIT_CAPACITY",
                        value,
                    })
                }
            }
        }
        if let Some(path) = lookup("OVERLINK_AUDIO_CONFIG") {
            self.audio_config = Some(PathBuf::from(path));
        }

        match invalid {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity;
        self
    }

    pub fn with_debug_mode(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    pub fn with_audio_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.audio_config = Some(path.into());
        self
    }

    /// Transition queued by `enter_zone`
    pub fn with_default_transition(mut self, kind: TransitionKind, duration_ms: u64) -> Self {
        self.default_transition = kind;
        self.transition_duration_ms = duration_ms;
        self
    }

    pub fn with_lineage_tracking(mut self, enabled: bool) -> Self {
        self.lineage_tracking = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.metadata_path, PathBuf::from("remix_meta.json"));
        assert_eq!(config.audit_capacity, 100);
        assert_eq!(config.default_transition, TransitionKind::Fade);
        assert_eq!(config.transition_duration_ms, 300);
        assert!(config.lineage_tracking);
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = HubConfig::default();
        config
            .apply_env_overrides(env(&[
                ("OVERLINK_METADATA_PATH", "out/meta.json"),
                ("OVERLINK_DEBUG", "1"),
                ("OVERLINK_AUDIT_CAPACITY", "250"),
                ("OVERLINK_AUDIO_CONFIG", "audio.json"),
            ]))
            .unwrap();

        assert_eq!(config.metadata_path, PathBuf::from("out/meta.json"));
        assert!(config.debug_mode);
        assert_eq!(config.audit_capacity, 250);
        assert_eq!(config.audio_config, Some(PathBuf::from("audio.json")));
    }

    #[test]
    fn test_invalid_env_keeps_other_overrides() {
        let mut config = HubConfig::default();
        let err = config
            .apply_env_overrides(env(&[
                ("OVERLINK_AUDIT_CAPACITY", "lots"),
                ("OVERLINK_DEBUG", ""),
            ]))
            .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidEnv { var: "OVERLINK_AUDIT_CAPACITY", .. }));
        assert_eq!(config.audit_capacity, 100);
        assert!(config.debug_mode);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: HubConfig =
            serde_json::from_str(r#"{"debugMode": true, "defaultTransition": "slide"}"#).unwrap();
        assert!(config.debug_mode);
        assert_eq!(config.default_transition, TransitionKind::Slide);
        assert_eq!(config.transition_duration_ms, 300);
    }

    #[test]
    fn test_builders() {
        let config = HubConfig::default()
            .with_metadata_path("meta.json")
            .with_default_transition(TransitionKind::Instant, 0)
            .with_lineage_tracking(false);
        assert_eq!(config.metadata_path, PathBuf::from("meta.json"));
        assert_eq!(config.default_transition, TransitionKind::Instant);
        assert_eq!(config.transition_duration_ms, 0);
        assert!(!config.lineage_tracking);
    }
}
