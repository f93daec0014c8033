//! Entry point for the presentation layer.
//!
//! Wires the resolver, the validator and the service together so a caller
//! only needs `submit(persona_id, query_text)`. Nothing is cached between
//! calls: each submission re-checks the environment and re-resolves the
//! credential.

use crate::classifier::ClassifiedError;
use crate::config::GatewayConfig;
use crate::credential::{CredentialResolver, KeyValidator};
use crate::environment::{
    CREDENTIAL_LOOKUP_CAPABILITY, CapabilityState, CapabilityStatus, EnvironmentSnapshot,
    EnvironmentValidator,
};
use crate::error::{CoreError, KeyValidationFailure};
use crate::model_client::{ModelClient, OpenAiChatClient, parse_endpoint};
use crate::persona::{Persona, PersonaRegistry};
use crate::service::{DispatchSettings, ExpertResponseService, Response};

use log::warn;

/// What the status panel shows about the credential. Never the raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSummary {
    Configured {
        source: &'static str,
        masked: String,
        length: usize,
        warning: Option<KeyValidationFailure>,
    },
    Absent {
        key_name: String,
    },
    LookupFailed {
        detail: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub capabilities: EnvironmentSnapshot,
    pub credential: CredentialSummary,
}

pub struct ConsultationGateway<C> {
    resolver: CredentialResolver,
    validator: EnvironmentValidator,
    key_validator: KeyValidator,
    service: ExpertResponseService<C>,
}

impl ConsultationGateway<OpenAiChatClient> {
    /// Gateway backed by the OpenAI-compatible HTTP client.
    ///
    /// An unusable endpoint does not fail here: it is reported as the
    /// `model-client` capability by `status_report` and `submit`.
    ///
    /// # Errors
    /// Returns [`CoreError`] if the config is invalid.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, CoreError> {
        config.validate()?;

        Ok(Self::new(
            config,
            CredentialResolver::from_config(&config.credential),
            EnvironmentValidator::from_config(config),
            OpenAiChatClient::from_config(&config.model),
        ))
    }
}

impl<C: ModelClient> ConsultationGateway<C> {
    pub fn new(
        config: &GatewayConfig,
        resolver: CredentialResolver,
        validator: EnvironmentValidator,
        client: C,
    ) -> Self {
        let host = parse_endpoint(&config.model.endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            resolver,
            validator,
            key_validator: KeyValidator::for_host(&host),
            service: ExpertResponseService::new(client, DispatchSettings::from_config(&config.model)),
        }
    }

    /// Name of the credential this gateway looks up.
    pub fn credential_key_name(&self) -> &str {
        self.resolver.key_name()
    }

    /// Personas in declaration order.
    pub fn personas(&self) -> impl Iterator<Item = &'static Persona> {
        PersonaRegistry::global().iter()
    }

    /// Check the environment, resolve the credential, and answer.
    pub async fn submit(&self, persona_id: &str, query_text: &str) -> Response {
        let environment = self.validator.check();

        let credential = match self.resolver.resolve() {
            Ok(credential) => credential,
            Err(e) => {
                warn!("Credential lookup failed: {}", e);
                return Err(ClassifiedError::capability_unavailable(&CapabilityStatus {
                    name: CREDENTIAL_LOOKUP_CAPABILITY.to_string(),
                    state: CapabilityState::Faulted,
                    detail: Some(e.to_string()),
                }));
            }
        };

        if let Some(credential) = &credential
            && let Some(warning) = self.key_validator.check(credential)
        {
            warn!("Credential from {} looks suspicious: {}", credential.source_name(), warning);
        }

        self.service
            .answer(persona_id, query_text, credential.as_ref(), &environment)
            .await
    }

    /// Capability states plus a masked credential summary.
    pub fn status_report(&self) -> StatusReport {
        let credential = match self.resolver.resolve() {
            Ok(Some(credential)) => CredentialSummary::Configured {
                source: credential.source_name(),
                masked: credential.masked(),
                length: credential.len(),
                warning: self.key_validator.check(&credential),
            },
            Ok(None) => CredentialSummary::Absent {
                key_name: self.resolver.key_name().to_string(),
            },
            Err(e) => CredentialSummary::LookupFailed {
                detail: e.to_string(),
            },
        };

        StatusReport {
            capabilities: self.validator.check(),
            credential,
        }
    }
}
