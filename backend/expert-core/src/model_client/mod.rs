//! The external generative-model capability.
//!
//! [`ModelClient`] is the seam the dispatch service talks to; the bundled
//! [`OpenAiChatClient`] speaks the OpenAI-compatible chat completions API.
//! No retries, no streaming.

use crate::config::ModelConfig;
use crate::credential::Credential;
use crate::error::ModelClientError;

use common::ErrorLocation;

use std::future::Future;
use std::panic::Location;
use std::time::Duration;

use log::debug;
use once_cell::sync::OnceCell;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::{Deserialize, Serialize};
use url::Url;

const CHAT_COMPLETIONS_ENDPOINT: &str = "chat/completions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Everything the provider needs apart from the credential.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub messages: &'a [ChatMessage],
}

/// Opaque `invoke(messages) -> text | failure` capability.
pub trait ModelClient: Send + Sync {
    fn invoke(
        &self,
        request: &ChatRequest<'_>,
        credential: &Credential,
    ) -> impl Future<Output = Result<String, ModelClientError>> + Send;
}

/// Client for `POST {endpoint}/chat/completions`.
///
/// Construction never fails: the endpoint is parsed and the HTTP client
/// built on first use, so a bad endpoint surfaces through the
/// `model-client` capability check instead of preventing start-up.
#[derive(Clone)]
pub struct OpenAiChatClient {
    endpoint: String,
    timeout: Duration,
    connection: OnceCell<Connection>,
}

#[derive(Clone)]
struct Connection {
    base_url: Url,
    client: Client,
}

impl OpenAiChatClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            connection: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self::new(config.endpoint.clone(), config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Normalised base URL.
    ///
    /// # Errors
    /// Returns the endpoint or client-build failure, if any.
    pub fn base_url(&self) -> Result<&Url, ModelClientError> {
        self.connection().map(|connection| &connection.base_url)
    }

    fn connection(&self) -> Result<&Connection, ModelClientError> {
        self.connection.get_or_try_init(|| {
            Ok(Connection {
                base_url: parse_endpoint(&self.endpoint)?,
                client: build_http_client(self.timeout)?,
            })
        })
    }
}

impl ModelClient for OpenAiChatClient {
    async fn invoke(
        &self,
        request: &ChatRequest<'_>,
        credential: &Credential,
    ) -> Result<String, ModelClientError> {
        let authorization = authorization_header(credential)?;
        let connection = self.connection()?;
        let url = connection.base_url.join(CHAT_COMPLETIONS_ENDPOINT)?;

        debug!(
            "POST {} (model {}, {} messages)",
            url,
            request.model,
            request.messages.len()
        );

        let response = connection
            .client
            .post(url)
            .header(AUTHORIZATION, authorization)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_body(status.as_u16(), &body));
        }

        let completion: ChatCompletion = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelClientError::malformed("Response contained no message content"))
    }
}

/// `Bearer <credential>`, marked sensitive.
///
/// Control characters (a pasted newline, say) cannot travel in a header;
/// that is a problem with the key, not with the HTTP stack.
pub(crate) fn authorization_header(credential: &Credential) -> Result<HeaderValue, ModelClientError> {
    let mut value = HeaderValue::try_from(format!("Bearer {}", credential.expose())).map_err(|_| {
        ModelClientError::InvalidCredential {
            message: format!(
                "Credential from {} contains characters not allowed in an HTTP header",
                credential.source_name()
            ),
            location: ErrorLocation::from(Location::caller()),
        }
    })?;
    value.set_sensitive(true);

    Ok(value)
}

/// Build the shared HTTP client.
///
/// Fails only when the TLS backend or system resources are unavailable.
pub fn build_http_client(timeout: Duration) -> Result<Client, ModelClientError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ModelClientError::ClientBuild {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Parse the configured endpoint, normalised to end with `/` so that
/// relative joins keep the version path segment.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ModelClientError> {
    let mut url = Url::parse(endpoint)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ModelClientError::UrlParse {
            message: format!("Unsupported endpoint scheme '{}'", url.scheme()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}

/// Turn a non-2xx response into a structured error, keeping the provider's
/// own `code`/`type` when the body is the standard error envelope.
pub(crate) fn error_from_body(status_code: u16, body: &str) -> ModelClientError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => ModelClientError::from_status(
            status_code,
            envelope
                .error
                .message
                .unwrap_or_else(|| format!("HTTP {status_code}")),
            envelope.error.code,
            envelope.error.kind,
        ),
        Err(_) if body.trim().is_empty() => {
            ModelClientError::from_status(status_code, format!("HTTP {status_code}"), None, None)
        }
        Err(_) => ModelClientError::from_status(status_code, body.trim(), None, None),
    }
}
