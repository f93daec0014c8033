//! Single-request dispatch to the model on behalf of a persona.

use crate::classifier::{ClassifiedError, RawFailure, classify};
use crate::config::ModelConfig;
use crate::credential::Credential;
use crate::environment::EnvironmentSnapshot;
use crate::model_client::{ChatMessage, ChatRequest, ModelClient};
use crate::persona::{Persona, PersonaId, PersonaRegistry};

use log::{debug, info, warn};
use serde::Serialize;
use uuid::Uuid;

/// Outcome of one consultation.
pub type Response = Result<ExpertAnswer, ClassifiedError>;

/// A successful answer, tied to the persona that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpertAnswer {
    pub persona: PersonaId,
    /// Model output, verbatim.
    pub answer_text: String,
    pub model: String,
}

/// Sampling settings shared by every persona.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSettings {
    pub model_id: String,
    pub temperature: f32,
}

impl DispatchSettings {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            model_id: config.model_id.clone(),
            temperature: config.temperature,
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from_config(&ModelConfig::default())
    }
}

/// Stateless orchestrator: preconditions, payload assembly, invocation.
pub struct ExpertResponseService<C> {
    registry: &'static PersonaRegistry,
    client: C,
    settings: DispatchSettings,
}

impl<C: ModelClient> ExpertResponseService<C> {
    pub fn new(client: C, settings: DispatchSettings) -> Self {
        Self {
            registry: PersonaRegistry::global(),
            client,
            settings,
        }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Answer `query_text` as the persona named by `persona_id`.
    ///
    /// Preconditions are checked in this order, each short-circuiting:
    /// credential present, query non-blank, every capability available,
    /// persona known. Client failures are returned classified.
    pub async fn answer(
        &self,
        persona_id: &str,
        query_text: &str,
        credential: Option<&Credential>,
        environment: &EnvironmentSnapshot,
    ) -> Response {
        let request_id = Uuid::new_v4();

        let Some(credential) = credential.filter(|c| !c.is_empty()) else {
            debug!("[{request_id}] rejected: no credential");
            return Err(ClassifiedError::missing_credential());
        };

        if query_text.trim().is_empty() {
            debug!("[{request_id}] rejected: empty query");
            return Err(ClassifiedError::empty_query());
        }

        if let Some(status) = environment.first_unavailable() {
            debug!("[{request_id}] rejected: capability {} {}", status.name, status.state);
            return Err(ClassifiedError::capability_unavailable(status));
        }

        let Ok(persona) = self.registry.get(persona_id) else {
            debug!("[{request_id}] rejected: unknown persona '{persona_id}'");
            return Err(ClassifiedError::unknown_persona(persona_id));
        };

        let messages = build_messages(persona, query_text);
        let request = ChatRequest {
            model: &self.settings.model_id,
            temperature: self.settings.temperature,
            messages: &messages,
        };

        info!(
            "[{request_id}] dispatching to {} as {} (credential from {})",
            self.settings.model_id,
            persona.id,
            credential.source_name()
        );

        match self.client.invoke(&request, credential).await {
            Ok(answer_text) => {
                info!("[{request_id}] answered ({} chars)", answer_text.chars().count());
                Ok(ExpertAnswer {
                    persona: persona.id,
                    answer_text,
                    model: self.settings.model_id.clone(),
                })
            }
            Err(error) => {
                let classified = classify(RawFailure::Client(error));
                warn!("[{request_id}] failed: {}", classified.category);
                Err(classified)
            }
        }
    }
}

/// System message carries the persona's instruction exactly; the user
/// message is a persona-labelled header line, a blank line, then the query.
pub fn build_messages(persona: &Persona, query_text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(persona.system_instruction),
        ChatMessage::user(format!(
            "{}\n\n{}",
            persona_header(persona),
            query_text
        )),
    ]
}

pub fn persona_header(persona: &Persona) -> String {
    format!("[Consultation for: {}]", persona.display_name)
}
