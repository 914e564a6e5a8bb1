use std::path::Path;

use serde::{Deserialize, Serialize};

use impulse_core::ShakeError;
use impulse_core::settings::PresetLibrary;

/// Environment variable naming a config file to load first.
pub const CONFIG_ENV_VAR: &str = "IMPULSE_CONFIG";
/// Config file checked when the environment variable is unset or unusable.
pub const DEFAULT_CONFIG_PATH: &str = "config/impulse.toml";

/// Data-driven configuration for a shake director.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Global multiplier applied to every shake. Negative values become zero.
    pub amplitude_override: f32,
    /// Named presets available to `ShakeDirector::shake_preset`.
    pub presets: PresetLibrary,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            amplitude_override: 1.0,
            presets: PresetLibrary::default(),
        }
    }
}

impl DirectorConfig {
    /// Load config from `IMPULSE_CONFIG` or `config/impulse.toml`, falling
    /// back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            match Self::try_load_from(&path) {
                Ok(config) => return config,
                Err(e) => tracing::debug!(path = %path, error = %e, "Ignoring shake config"),
            }
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            match Self::try_load_from(DEFAULT_CONFIG_PATH) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::debug!(path = DEFAULT_CONFIG_PATH, error = %e, "Ignoring shake config")
                }
            }
        }
        Self::default()
    }

    pub fn try_load_from(path: impl AsRef<Path>) -> Result<Self, ShakeError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ShakeError> {
        let mut config: Self = toml::from_str(contents)?;
        config.amplitude_override = config.amplitude_override.max(0.0);
        Ok(config)
    }
}
