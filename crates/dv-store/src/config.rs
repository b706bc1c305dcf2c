//! User configuration stored as YAML under the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dv_core::{CoreError, CoreResult};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "devvault";

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable holding the API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "DEVVAULT_API_KEY";

/// Top-level configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct VaultConfig {
    /// Simulated save latency when submitting a draft.
    pub save_delay_ms: u64,
    /// Autofill settings.
    pub assist: AssistConfig,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            save_delay_ms: 1000,
            assist: AssistConfig::default(),
        }
    }
}

/// Settings for the text-generation autofill.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AssistConfig {
    pub enabled: bool,
    /// Full `generateContent` URL. Autofill stays off until this is set.
    pub endpoint: Option<String>,
    /// Name of the environment variable that holds the key.
    pub api_key_env: String,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            debounce_ms: 1000,
            timeout_secs: 20,
        }
    }
}

impl AssistConfig {
    /// Read the key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Endpoint and key when autofill is enabled and fully configured.
    pub fn credentials(&self) -> Option<(String, String)> {
        if !self.enabled {
            return None;
        }
        let endpoint = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())?;
        Some((endpoint.to_string(), self.api_key()?))
    }
}

/// Default location of the config file.
pub fn config_path() -> CoreResult<PathBuf> {
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    Err(CoreError::Storage(
        "unable to determine config directory".into(),
    ))
}

fn resolve(path: Option<&Path>) -> CoreResult<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => config_path(),
    }
}

/// Load the config, falling back to defaults when the file is missing.
pub fn load_config(path: Option<&Path>) -> CoreResult<VaultConfig> {
    let path = resolve(path)?;
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file missing, using defaults");
        return Ok(VaultConfig::default());
    }
    let contents = fs::read_to_string(&path)
        .map_err(|err| CoreError::Storage(err.to_string()))?;
    serde_yaml::from_str(&contents).map_err(|err| CoreError::Storage(err.to_string()))
}

/// Write the config, creating parent directories. Returns the path written.
pub fn save_config(config: &VaultConfig, path: Option<&Path>) -> CoreResult<PathBuf> {
    let path = resolve(path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| CoreError::Storage(err.to_string()))?;
    }
    let contents = serde_yaml::to_string(config)
        .map_err(|err| CoreError::Storage(err.to_string()))?;
    fs::write(&path, contents).map_err(|err| CoreError::Storage(err.to_string()))?;
    Ok(path)
}
