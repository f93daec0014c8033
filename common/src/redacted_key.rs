//! Secure API key handling with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// Number of leading characters `masked()` is allowed to reveal.
pub const MASK_VISIBLE_PREFIX: usize = 5;

const MASK_FILL: &str = "*****";

/// An API key that never exposes its value in logs or debug output.
#[derive(Clone)]
pub struct RedactedApiKey {
    inner: String,
}

impl RedactedApiKey {
    /// Create a new redacted API key.
    pub fn new(key: String) -> Self {
        Self { inner: key }
    }

    /// Get the actual key value for transmission.
    ///
    /// # Security Note
    /// Only call this when actually sending the key to the provider.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Get the key length in characters (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.chars().count()
    }

    /// Check if the key is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Display-safe form: a fixed-length prefix, a fixed fill and the length.
    ///
    /// Keys shorter than the prefix are fully hidden so the mask never
    /// reveals the whole secret.
    pub fn masked(&self) -> String {
        let length = self.len();
        let prefix: String = if length > MASK_VISIBLE_PREFIX {
            self.inner.chars().take(MASK_VISIBLE_PREFIX).collect()
        } else {
            String::new()
        };

        format!("{prefix}{MASK_FILL}({length} chars)")
    }
}

impl fmt::Debug for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedApiKey([REDACTED])")
    }
}

impl fmt::Display for RedactedApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED API KEY]")
    }
}

impl Drop for RedactedApiKey {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedApiKey {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::SerializationRefused {
            type_name: "RedactedApiKey",
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
