//! Error types for the model client.
//!
//! Key design decisions:
//! - HTTP status codes stored directly (not parsed from strings)
//! - Transport flags captured from `reqwest::Error` BEFORE it is stringified
//! - Provider error `code`/`type` kept when the body carries them

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelClientError {
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        is_timeout: bool,
        is_connect: bool,
        location: ErrorLocation,
    },

    #[error("Provider Error: HTTP {status_code} - {message} {location}")]
    Status {
        status_code: HttpStatusCode,
        message: String,
        provider_code: Option<String>,
        provider_type: Option<String>,
        location: ErrorLocation,
    },

    #[error("Malformed Response Error: {message} {location}")]
    MalformedResponse {
        message: String,
        location: ErrorLocation,
    },

    /// The credential cannot be carried in an `Authorization` header.
    #[error("Invalid Credential Error: {message} {location}")]
    InvalidCredential {
        message: String,
        location: ErrorLocation,
    },

    /// A single request could not be assembled (the client itself is fine).
    #[error("Request Build Error: {message} {location}")]
    RequestBuild {
        message: String,
        location: ErrorLocation,
    },

    #[error("Client Build Error: {message} {location}")]
    ClientBuild {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },
}

impl ModelClientError {
    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        ModelClientError::MalformedResponse {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create from HTTP response with explicit status code.
    #[track_caller]
    pub fn from_status(
        status_code: u16,
        message: impl Into<String>,
        provider_code: Option<String>,
        provider_type: Option<String>,
    ) -> Self {
        ModelClientError::Status {
            status_code: HttpStatusCode(status_code),
            message: message.into(),
            provider_code,
            provider_type,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// The failure text without the location suffix.
    pub fn message(&self) -> &str {
        match self {
            ModelClientError::Transport { message, .. }
            | ModelClientError::Status { message, .. }
            | ModelClientError::MalformedResponse { message, .. }
            | ModelClientError::InvalidCredential { message, .. }
            | ModelClientError::RequestBuild { message, .. }
            | ModelClientError::ClientBuild { message, .. }
            | ModelClientError::UrlParse { message, .. } => message,
        }
    }

    /// Get HTTP status code if applicable.
    pub fn status_code(&self) -> Option<HttpStatusCode> {
        match self {
            ModelClientError::Status { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ModelClientError {
    /// Categorize from the error's structure; the text is kept only as detail.
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let location = ErrorLocation::from(Location::caller());
        let message = describe_chain(&error);

        if error.is_builder() {
            return ModelClientError::RequestBuild {
                message,
                location,
            };
        }

        if error.is_decode() {
            return ModelClientError::MalformedResponse {
                message,
                location,
            };
        }

        if let Some(status) = error.status() {
            return ModelClientError::Status {
                status_code: HttpStatusCode(status.as_u16()),
                message,
                provider_code: None,
                provider_type: None,
                location,
            };
        }

        ModelClientError::Transport {
            is_timeout: error.is_timeout(),
            is_connect: error.is_connect(),
            message,
            location,
        }
    }
}

impl From<url::ParseError> for ModelClientError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ModelClientError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for ModelClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ModelClientError::MalformedResponse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// The error's text followed by every `source()` cause, joined with `": "`.
///
/// reqwest's own Display stops at "error sending request"; the cause
/// (refused, timed out, DNS) lives further down the chain.
pub(crate) fn describe_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}
