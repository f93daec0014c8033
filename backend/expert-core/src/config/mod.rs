use crate::error::config::ConfigError;
use crate::{
    DEFAULT_CREDENTIAL_KEY, DEFAULT_MODEL_ENDPOINT, DEFAULT_MODEL_ID, DEFAULT_TEMPERATURE,
    GATEWAY_APP_DIR,
};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "gateway.toml";
const CONFIG_VERSION: u32 = 1;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Key looked up in every credential source.
    #[serde(default = "default_key_name")]
    pub key_name: String,
    /// Overrides `<config dir>/expert-gateway/secrets.toml`.
    #[serde(default)]
    pub secret_store_path: Option<PathBuf>,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            key_name: default_key_name(),
            secret_store_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of an OpenAI-compatible API; `chat/completions` is joined onto it.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ModelConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub credential: CredentialConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            credential: CredentialConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_key_name() -> String {
    DEFAULT_CREDENTIAL_KEY.to_string()
}
fn default_endpoint() -> String {
    DEFAULT_MODEL_ENDPOINT.to_string()
}
fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}
fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
fn default_request_timeout_secs() -> u64 {
    60
}

// ============================================
// IMPLEMENTATION
// ============================================

impl GatewayConfig {
    /// `<config dir>/expert-gateway/gateway.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryNotFound`] if the platform has no config dir.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(GATEWAY_APP_DIR).join(CONFIG_FILE_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
                reason: "Cannot determine the platform config directory".to_string(),
            })
    }

    /// Load config from a TOML file.
    ///
    /// # Returns
    ///
    /// Returns `Ok(GatewayConfig)` if loaded successfully or defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.to_path_buf(),
                source: e,
            }
        })?;

        let config: GatewayConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(validation_error(format!(
                "Invalid version: {} (expected 1-{})",
                self.version, CONFIG_VERSION
            )));
        }

        let key_name = &self.credential.key_name;
        if key_name.is_empty() || key_name.chars().any(char::is_whitespace) {
            return Err(validation_error(format!(
                "Invalid credential key name: '{}'",
                key_name
            )));
        }

        let endpoint = &self.model.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(validation_error(format!(
                "Invalid model endpoint: {}",
                endpoint
            )));
        }

        if self.model.model_id.trim().is_empty() {
            return Err(validation_error("model_id cannot be empty".to_string()));
        }

        // Must stay low but nonzero.
        let temperature = self.model.temperature;
        if !(temperature > 0.0 && temperature <= 1.0) {
            return Err(validation_error(format!(
                "Invalid temperature: {} (must be > 0.0 and <= 1.0)",
                temperature
            )));
        }

        if self.model.request_timeout_secs == 0 {
            return Err(validation_error(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn validation_error(reason: String) -> ConfigError {
    ConfigError::ValidationError {
        location: ErrorLocation::from(Location::caller()),
        reason,
    }
}
