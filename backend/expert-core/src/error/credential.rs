//! Error types for credential lookup.
//!
//! An absent credential is NOT an error: sources return `Ok(None)` for that.
//! These variants describe a source that could not be consulted at all.

use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use thiserror::Error as ThisError;

/// A credential source failed while being consulted.
#[derive(Debug, ThisError)]
pub enum CredentialLookupError {
    #[error("Secret Store Unavailable Error: {message} {location}")]
    SecretStoreUnavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Secret Store Read Error: {path}: {source} {location}")]
    SecretStoreRead {
        path: PathBuf,
        location: ErrorLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret Store Parse Error: {path}: {reason} {location}")]
    SecretStoreParse {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Environment Error: {key} contains invalid unicode {location}")]
    EnvNotUnicode {
        key: String,
        location: ErrorLocation,
    },
}

impl CredentialLookupError {
    #[track_caller]
    pub fn secret_store_unavailable(message: impl Into<String>) -> Self {
        CredentialLookupError::SecretStoreUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn secret_store_parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CredentialLookupError::SecretStoreParse {
            path: path.into(),
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn env_not_unicode(key: impl Into<String>) -> Self {
        CredentialLookupError::EnvNotUnicode {
            key: key.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Name of the source that failed.
    pub fn source_name(&self) -> &'static str {
        match self {
            CredentialLookupError::EnvNotUnicode { .. } => crate::credential::ENVIRONMENT_SOURCE,
            _ => crate::credential::SECRET_STORE_SOURCE,
        }
    }
}

/// Specific reasons a resolved key looks malformed.
///
/// Advisory only: the provider decides whether a key is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyValidationFailure {
    TooShort { min: usize, actual: usize },
    TooLong { max: usize, actual: usize },
    InvalidPrefix { expected: &'static str, actual: String },
    PlaceholderDetected { pattern: &'static str },
    InvalidCharacters,
}

impl std::fmt::Display for KeyValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooShort { min, actual } => {
                write!(f, "key too short ({} chars, minimum {})", actual, min)
            }
            Self::TooLong { max, actual } => {
                write!(f, "key too long ({} chars, maximum {})", actual, max)
            }
            Self::InvalidPrefix { expected, actual } => {
                write!(f, "expected prefix '{}', got '{}'", expected, actual)
            }
            Self::PlaceholderDetected { pattern } => {
                write!(f, "detected placeholder pattern '{}'", pattern)
            }
            Self::InvalidCharacters => write!(f, "contains invalid characters"),
        }
    }
}
