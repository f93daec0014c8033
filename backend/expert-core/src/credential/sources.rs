//! Built-in credential sources.

use super::{CredentialSource, ENVIRONMENT_SOURCE, SECRET_STORE_SOURCE};
use crate::GATEWAY_APP_DIR;
use crate::config::CredentialConfig;
use crate::error::CredentialLookupError;

use common::ErrorLocation;

use std::env;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::debug;

const SECRETS_FILE_NAME: &str = "secrets.toml";

/// Managed secret store: a TOML file of top-level `KEY = "value"` pairs.
///
/// Read-only. The file should be readable by the current user only.
#[derive(Debug, Clone)]
pub struct SecretStoreSource {
    path: Option<PathBuf>,
}

impl SecretStoreSource {
    /// Store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store whose location could not be determined. Every lookup fails.
    pub fn unlocated() -> Self {
        Self { path: None }
    }

    /// Configured path, else `<config dir>/expert-gateway/secrets.toml`.
    pub fn from_config(config: &CredentialConfig) -> Self {
        Self {
            path: config
                .secret_store_path
                .clone()
                .or_else(default_secret_store_path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn load_table(&self) -> Result<Option<toml::Table>, CredentialLookupError> {
        let path = self.path.as_ref().ok_or_else(|| {
            CredentialLookupError::secret_store_unavailable(
                "Cannot determine the secret store location. Set credential.secret_store_path.",
            )
        })?;

        if !path.exists() {
            debug!("Secret store not found at {}", path.display());
            return Ok(None);
        }

        let contents =
            fs::read_to_string(path).map_err(|e| CredentialLookupError::SecretStoreRead {
                path: path.clone(),
                location: ErrorLocation::from(Location::caller()),
                source: e,
            })?;

        let table: toml::Table = toml::from_str(&contents)
            .map_err(|e| CredentialLookupError::secret_store_parse(path, e.to_string()))?;

        Ok(Some(table))
    }
}

impl CredentialSource for SecretStoreSource {
    fn name(&self) -> &'static str {
        SECRET_STORE_SOURCE
    }

    fn lookup(&self, key: &str) -> Result<Option<String>, CredentialLookupError> {
        let Some(table) = self.load_table()? else {
            return Ok(None);
        };

        match table.get(key) {
            None => Ok(None),
            Some(toml::Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(CredentialLookupError::secret_store_parse(
                self.path.clone().unwrap_or_default(),
                format!("{key} must be a string, found {}", other.type_str()),
            )),
        }
    }
}

/// The process environment (after any `.env` loading done at start-up).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSource;

impl CredentialSource for EnvironmentSource {
    fn name(&self) -> &'static str {
        ENVIRONMENT_SOURCE
    }

    fn lookup(&self, key: &str) -> Result<Option<String>, CredentialLookupError> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(env::VarError::NotUnicode(_)) => Err(CredentialLookupError::env_not_unicode(key)),
        }
    }
}

fn default_secret_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(GATEWAY_APP_DIR).join(SECRETS_FILE_NAME))
}
