use super::{
    CREDENTIAL_LOOKUP_CAPABILITY, CapabilityProbe, MODEL_CLIENT_CAPABILITY, ProbeOutcome,
};
use crate::config::{CredentialConfig, ModelConfig};
use crate::credential::{CredentialSource, EnvironmentSource, SecretStoreSource};
use crate::credential::dotenv::{check_dotenv_file, working_dir_dotenv};
use crate::error::CredentialLookupError;
use crate::model_client::{build_http_client, parse_endpoint};

use std::path::PathBuf;
use std::time::Duration;

/// The HTTP client can be built and the endpoint is usable.
#[derive(Debug, Clone)]
pub struct ModelClientProbe {
    endpoint: String,
    timeout: Duration,
}

impl ModelClientProbe {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }
}

impl CapabilityProbe for ModelClientProbe {
    fn name(&self) -> &'static str {
        MODEL_CLIENT_CAPABILITY
    }

    fn probe(&self) -> ProbeOutcome {
        if let Err(e) = build_http_client(self.timeout) {
            return ProbeOutcome::Missing(e.to_string());
        }

        match parse_endpoint(&self.endpoint) {
            Ok(_) => ProbeOutcome::Available,
            Err(e) => ProbeOutcome::Faulted(e.to_string()),
        }
    }
}

/// Every credential source can be consulted for the configured key, and any
/// working-directory `.env` parses. The value itself is discarded.
#[derive(Debug, Clone)]
pub struct CredentialLookupProbe {
    key_name: String,
    secret_store: SecretStoreSource,
    dotenv_path: Option<PathBuf>,
}

impl CredentialLookupProbe {
    pub fn new(
        key_name: impl Into<String>,
        secret_store: SecretStoreSource,
        dotenv_path: Option<PathBuf>,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            secret_store,
            dotenv_path,
        }
    }

    pub fn from_config(config: &CredentialConfig) -> Self {
        Self::new(
            config.key_name.clone(),
            SecretStoreSource::from_config(config),
            working_dir_dotenv(),
        )
    }
}

impl CapabilityProbe for CredentialLookupProbe {
    fn name(&self) -> &'static str {
        CREDENTIAL_LOOKUP_CAPABILITY
    }

    fn probe(&self) -> ProbeOutcome {
        match self.secret_store.lookup(&self.key_name) {
            Ok(_) => {}
            Err(e @ CredentialLookupError::SecretStoreUnavailable { .. }) => {
                return ProbeOutcome::Missing(e.to_string());
            }
            Err(e) => return ProbeOutcome::Faulted(e.to_string()),
        }

        if let Err(e) = EnvironmentSource.lookup(&self.key_name) {
            return ProbeOutcome::Faulted(e.to_string());
        }

        if let Some(path) = &self.dotenv_path
            && let Err(reason) = check_dotenv_file(path)
        {
            return ProbeOutcome::Faulted(format!("Invalid .env file: {reason}"));
        }

        ProbeOutcome::Available
    }
}
