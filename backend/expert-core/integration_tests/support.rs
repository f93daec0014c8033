//! Shared fixtures for integration tests.
//!
//! - A recording, in-memory `ModelClient`
//! - Ready-made environment snapshots
//! - A credential helper

use expert_core::environment::{
    CREDENTIAL_LOOKUP_CAPABILITY, CapabilityState, CapabilityStatus, EnvironmentSnapshot,
    MODEL_CLIENT_CAPABILITY,
};
use expert_core::error::ModelClientError;
use expert_core::{ChatMessage, ChatRequest, Credential, ModelClient};

use std::sync::{Arc, Mutex};

/// One call as seen by the fake client.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
    pub credential_source: &'static str,
}

type Behaviour = Box<dyn Fn() -> Result<String, ModelClientError> + Send + Sync>;

/// In-memory model client returning a canned outcome and recording every call.
pub struct FakeModelClient {
    behaviour: Behaviour,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl FakeModelClient {
    pub fn answering(text: &str) -> Self {
        let text = text.to_string();
        Self::with(move || Ok(text.clone()))
    }

    pub fn failing(make_error: impl Fn() -> ModelClientError + Send + Sync + 'static) -> Self {
        Self::with(move || Err(make_error()))
    }

    fn with(
        behaviour: impl Fn() -> Result<String, ModelClientError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            behaviour: Box::new(behaviour),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Handle that stays readable after the client is moved into a service.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }
}

impl ModelClient for FakeModelClient {
    async fn invoke(
        &self,
        request: &ChatRequest<'_>,
        credential: &Credential,
    ) -> Result<String, ModelClientError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: request.model.to_string(),
            temperature: request.temperature,
            messages: request.messages.to_vec(),
            credential_source: credential.source_name(),
        });

        (self.behaviour)()
    }
}

pub fn available_snapshot() -> EnvironmentSnapshot {
    EnvironmentSnapshot::new(vec![
        status(MODEL_CLIENT_CAPABILITY, CapabilityState::Available, None),
        status(CREDENTIAL_LOOKUP_CAPABILITY, CapabilityState::Available, None),
    ])
}

pub fn status(name: &str, state: CapabilityState, detail: Option<&str>) -> CapabilityStatus {
    CapabilityStatus {
        name: name.to_string(),
        state,
        detail: detail.map(str::to_string),
    }
}

pub fn test_credential() -> Credential {
    Credential::new("sk-test-0123456789abcdefghij", "environment")
}
