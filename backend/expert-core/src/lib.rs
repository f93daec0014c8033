pub mod classifier;
pub mod config;
pub mod credential;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod model_client;
pub mod persona;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{ClassifiedError, ErrorCategory, RawFailure, classify};
pub use config::GatewayConfig;
pub use credential::{Credential, CredentialResolver};
pub use environment::{CapabilityState, CapabilityStatus, EnvironmentSnapshot, EnvironmentValidator};
pub use gateway::{ConsultationGateway, CredentialSummary, StatusReport};
pub use model_client::{ChatMessage, ChatRequest, ChatRole, ModelClient, OpenAiChatClient};
pub use persona::{Persona, PersonaId, PersonaRegistry};
pub use service::{ExpertAnswer, ExpertResponseService, Response};

/// Directory name used under the platform config/data dirs.
pub const GATEWAY_APP_DIR: &str = "expert-gateway";
pub const DEFAULT_CREDENTIAL_KEY: &str = "OPENAI_API_KEY";
pub const DEFAULT_PROVIDER_HOST: &str = "api.openai.com";
pub const DEFAULT_MODEL_ENDPOINT: &str =
    const_format::concatcp!("https://", DEFAULT_PROVIDER_HOST, "/v1/");
pub const DEFAULT_MODEL_ID: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
