//! Failure classification into user-facing categories.
//!
//! Structured signals (failure kind, HTTP status, provider error code) are
//! always consulted first. Keyword matching on the failure text is a
//! best-effort fallback used only when no structure is available: it is
//! phrasing- and locale-dependent and its word list is not authoritative.

use crate::environment::{CapabilityState, CapabilityStatus};
use crate::error::ModelClientError;

use common::ErrorLocation;

use std::fmt;
use std::panic::Location;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error as ThisError;

static CREDENTIAL_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bapi[ _-]?key\b|\bunauthori[sz]ed\b|\bauthenticat|\bincorrect key\b|\binvalid key\b|\b401\b|\bforbidden\b",
    )
    .expect("credential keyword pattern is valid")
});

static DEPENDENCY_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bnot installed\b|\bno module named\b|\bimport(?:ing)? error\b|\bmissing (?:library|dependency|module)\b|\bcannot load library\b",
    )
    .expect("dependency keyword pattern is valid")
});

static NETWORK_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\bnetwork\b|\bconnect(?:ion|ivity)?\b|\btimed? ?out\b|\bdns\b|\bunreachable\b|\bresolve host\b|\bproxy\b",
    )
    .expect("network keyword pattern is valid")
});

/// Fixed user-facing failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    MissingCredential,
    EmptyQuery,
    UnknownPersona,
    CapabilityUnavailable,
    CredentialError,
    DependencyError,
    NetworkError,
    UnknownError,
}

impl ErrorCategory {
    /// Detected locally before any external call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ErrorCategory::MissingCredential
                | ErrorCategory::EmptyQuery
                | ErrorCategory::UnknownPersona
                | ErrorCategory::CapabilityUnavailable
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::MissingCredential => "MissingCredential",
            ErrorCategory::EmptyQuery => "EmptyQuery",
            ErrorCategory::UnknownPersona => "UnknownPersona",
            ErrorCategory::CapabilityUnavailable => "CapabilityUnavailable",
            ErrorCategory::CredentialError => "CredentialError",
            ErrorCategory::DependencyError => "DependencyError",
            ErrorCategory::NetworkError => "NetworkError",
            ErrorCategory::UnknownError => "UnknownError",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure normalized into a category, with the diagnostic text kept.
#[derive(Debug, Clone, PartialEq, Eq, ThisError, Serialize)]
#[error("{category}: {detail} {location}")]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub detail: String,
    pub location: ErrorLocation,
}

impl ClassifiedError {
    #[track_caller]
    pub fn new(category: ErrorCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn missing_credential() -> Self {
        Self::new(
            ErrorCategory::MissingCredential,
            "No API credential is configured",
        )
    }

    #[track_caller]
    pub fn empty_query() -> Self {
        Self::new(ErrorCategory::EmptyQuery, "The question is empty")
    }

    #[track_caller]
    pub fn unknown_persona(persona_id: &str) -> Self {
        Self::new(
            ErrorCategory::UnknownPersona,
            format!("Unknown persona '{persona_id}'"),
        )
    }

    #[track_caller]
    pub fn capability_unavailable(status: &CapabilityStatus) -> Self {
        Self::new(
            ErrorCategory::CapabilityUnavailable,
            capability_detail(status),
        )
    }
}

/// A failure before it has been classified.
#[derive(Debug)]
pub enum RawFailure {
    /// No credential was available when the request was dispatched.
    CredentialAbsent,
    /// A required capability was not available.
    Capability(CapabilityStatus),
    /// The model client reported a failure.
    Client(ModelClientError),
    /// Failure text with no structure at all.
    Message(String),
}

/// Classify a raw failure.
///
/// Priority when several categories could apply: credential, dependency,
/// network, then unknown.
#[track_caller]
pub fn classify(raw: RawFailure) -> ClassifiedError {
    let (category, detail) = match raw {
        RawFailure::CredentialAbsent => (
            ErrorCategory::CredentialError,
            "No credential was available at dispatch time".to_string(),
        ),
        RawFailure::Capability(status) => {
            (ErrorCategory::DependencyError, capability_detail(&status))
        }
        RawFailure::Client(error) => {
            let category = classify_client_error(&error)
                .unwrap_or_else(|| classify_by_keywords(error.message()));
            (category, error.message().to_string())
        }
        RawFailure::Message(text) => (classify_by_keywords(&text), text),
    };

    ClassifiedError::new(category, detail)
}

/// Category from the error's structure, or `None` when it carries none.
pub(crate) fn classify_client_error(error: &ModelClientError) -> Option<ErrorCategory> {
    match error {
        ModelClientError::Status {
            status_code,
            provider_code,
            provider_type,
            ..
        } => {
            if status_code.is_auth_rejection()
                || is_credential_code(provider_code.as_deref())
                || is_credential_code(provider_type.as_deref())
            {
                Some(ErrorCategory::CredentialError)
            } else if status_code.is_transport_failure() {
                Some(ErrorCategory::NetworkError)
            } else {
                Some(ErrorCategory::UnknownError)
            }
        }
        ModelClientError::Transport {
            is_timeout,
            is_connect,
            ..
        } => (*is_timeout || *is_connect).then_some(ErrorCategory::NetworkError),
        ModelClientError::InvalidCredential { .. } => Some(ErrorCategory::CredentialError),
        ModelClientError::ClientBuild { .. } => Some(ErrorCategory::DependencyError),
        ModelClientError::MalformedResponse { .. }
        | ModelClientError::RequestBuild { .. }
        | ModelClientError::UrlParse { .. } => Some(ErrorCategory::UnknownError),
    }
}

fn is_credential_code(code: Option<&str>) -> bool {
    matches!(
        code,
        Some("invalid_api_key" | "authentication_error" | "invalid_authentication" | "missing_api_key")
    )
}

/// Best-effort keyword fallback.
pub(crate) fn classify_by_keywords(text: &str) -> ErrorCategory {
    if CREDENTIAL_KEYWORDS.is_match(text) {
        ErrorCategory::CredentialError
    } else if DEPENDENCY_KEYWORDS.is_match(text) {
        ErrorCategory::DependencyError
    } else if NETWORK_KEYWORDS.is_match(text) {
        ErrorCategory::NetworkError
    } else {
        ErrorCategory::UnknownError
    }
}

fn capability_detail(status: &CapabilityStatus) -> String {
    let detail = status.detail.as_deref().unwrap_or("no diagnostic available");
    match status.state {
        CapabilityState::Available => format!("Capability '{}' is available", status.name),
        state => format!("Capability '{}' is {}: {}", status.name, state, detail),
    }
}
