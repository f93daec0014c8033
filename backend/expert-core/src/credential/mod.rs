//! Provider credential resolution.
//!
//! # Features
//! - Ordered sources: managed secret store first, process environment second
//! - First non-empty value wins, tagged with the source it came from
//! - "No credential anywhere" is `Ok(None)`, not an error
//! - A source that fails to answer aborts resolution
//!
//! # Security
//! - Values wrapped in RedactedApiKey (safe Debug impl)
//! - Keys zeroized on drop
//! - Only the masked form is ever logged or displayed

pub mod dotenv;
pub mod sources;
pub mod validation;

pub use dotenv::{EnvLoadResult, load_dotenv};
pub use sources::{EnvironmentSource, SecretStoreSource};
pub use validation::KeyValidator;

use crate::config::CredentialConfig;
use crate::error::CredentialLookupError;

use common::RedactedApiKey;

use log::{debug, info};

pub const SECRET_STORE_SOURCE: &str = "secret-store";
pub const ENVIRONMENT_SOURCE: &str = "environment";

/// A named origin of the credential value.
pub trait CredentialSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Look up `key`.
    ///
    /// `Ok(None)` means the source simply has no value; `Err` means the
    /// source could not be consulted.
    fn lookup(&self, key: &str) -> Result<Option<String>, CredentialLookupError>;
}

/// The resolved secret plus where it came from.
#[derive(Debug, Clone)]
pub struct Credential {
    key: RedactedApiKey,
    source_name: &'static str,
}

impl Credential {
    pub fn new(value: impl Into<String>, source_name: &'static str) -> Self {
        Self {
            key: RedactedApiKey::new(value.into()),
            source_name,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source_name
    }

    /// The raw value, for the outbound request only.
    pub fn expose(&self) -> &str {
        self.key.expose()
    }

    pub fn masked(&self) -> String {
        self.key.masked()
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.expose().trim().is_empty()
    }
}

/// Walks the configured sources in priority order.
pub struct CredentialResolver {
    key_name: String,
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    /// Resolver over an explicit source list, tried in the given order.
    pub fn new(key_name: impl Into<String>, sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self {
            key_name: key_name.into(),
            sources,
        }
    }

    /// Standard chain: secret store, then environment.
    pub fn from_config(config: &CredentialConfig) -> Self {
        Self::new(
            config.key_name.clone(),
            vec![
                Box::new(SecretStoreSource::from_config(config)),
                Box::new(EnvironmentSource),
            ],
        )
    }

    pub fn key_name(&self) -> &str {
        &self.key_name
    }

    /// Resolve the credential.
    ///
    /// # Returns
    /// - `Ok(Some(Credential))` from the first source with a non-empty value
    /// - `Ok(None)` when every source is empty
    ///
    /// # Errors
    /// The first [`CredentialLookupError`] raised by a source. Lower-priority
    /// sources are not consulted after a failure.
    pub fn resolve(&self) -> Result<Option<Credential>, CredentialLookupError> {
        for source in &self.sources {
            match source.lookup(&self.key_name)? {
                Some(value) if !value.trim().is_empty() => {
                    let credential = Credential::new(value.trim(), source.name());
                    info!(
                        "Resolved {} from {} ({} chars)",
                        self.key_name,
                        source.name(),
                        credential.len()
                    );
                    return Ok(Some(credential));
                }
                Some(_) => {
                    debug!("{} in {} is blank, trying next source", self.key_name, source.name());
                }
                None => {
                    debug!("No {} in {}", self.key_name, source.name());
                }
            }
        }

        debug!("{} not configured in any source", self.key_name);
        Ok(None)
    }
}
