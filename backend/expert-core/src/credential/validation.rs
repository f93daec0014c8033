//! API key format diagnostics with provider-specific rules.
//!
//! Advisory: a finding is surfaced in the status report and the logs, it
//! never blocks a request.

use super::Credential;
use crate::DEFAULT_PROVIDER_HOST;
use crate::error::KeyValidationFailure;

/// Provider-specific format rules.
#[derive(Debug, Clone)]
pub struct KeyValidator {
    /// Expected prefix (e.g., "sk-" for OpenAI).
    expected_prefix: Option<&'static str>,
    min_length: usize,
    max_length: usize,
}

impl KeyValidator {
    /// Rules for the provider behind `endpoint_host`.
    ///
    /// Well-known hosts get their documented key format, anything else
    /// gets permissive defaults.
    pub fn for_host(endpoint_host: &str) -> Self {
        match endpoint_host {
            DEFAULT_PROVIDER_HOST => Self {
                expected_prefix: Some("sk-"),
                min_length: 20,
                max_length: 200,
            },
            _ => Self {
                expected_prefix: None,
                min_length: 10,
                max_length: 500,
            },
        }
    }

    /// Check a credential's shape. `None` means nothing suspicious was found.
    pub fn check(&self, credential: &Credential) -> Option<KeyValidationFailure> {
        self.check_value(credential.expose())
    }

    pub(crate) fn check_value(&self, key: &str) -> Option<KeyValidationFailure> {
        let trimmed = key.trim();
        let length = trimmed.chars().count();

        if length < self.min_length {
            return Some(KeyValidationFailure::TooShort {
                min: self.min_length,
                actual: length,
            });
        }

        if length > self.max_length {
            return Some(KeyValidationFailure::TooLong {
                max: self.max_length,
                actual: length,
            });
        }

        if let Some(expected) = self.expected_prefix
            && !trimmed.starts_with(expected)
        {
            let actual: String = trimmed.chars().take(expected.len()).collect();
            return Some(KeyValidationFailure::InvalidPrefix { expected, actual });
        }

        if let Some(pattern) = detect_placeholder(trimmed) {
            return Some(KeyValidationFailure::PlaceholderDetected { pattern });
        }

        if !is_valid_key_chars(trimmed) {
            return Some(KeyValidationFailure::InvalidCharacters);
        }

        None
    }
}

/// Detect common placeholder patterns.
///
/// Returns the matched pattern name if detected.
pub(crate) fn detect_placeholder(key: &str) -> Option<&'static str> {
    let lower = key.to_lowercase();

    static PATTERNS: &[(&str, &str)] = &[
        ("...", "ellipsis"),
        ("your-api-key", "your-api-key"),
        ("your_api_key", "your_api_key"),
        ("<your", "<your...>"),
        ("xxx", "xxx"),
        ("placeholder", "placeholder"),
        ("example", "example"),
        ("dummy", "dummy"),
        ("changeme", "changeme"),
        ("replace", "replace"),
    ];

    for (pattern, name) in PATTERNS {
        if lower.contains(pattern) {
            return Some(name);
        }
    }

    // Check for repeated characters (e.g., "aaaaaaaaaa")
    let mut chars = key.chars();
    if key.len() >= 10
        && let Some(first_char) = chars.next()
        && chars.all(|c| c == first_char)
    {
        return Some("repeated_char");
    }

    None
}

/// Valid: alphanumeric, hyphen, underscore, period, colon
fn is_valid_key_chars(key: &str) -> bool {
    key.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}
