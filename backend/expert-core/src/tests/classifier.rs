// Unit tests for the classifier's crate-private helpers
// End-to-end classification through the service is in integration_tests/service.rs

use crate::classifier::{ErrorCategory, classify_by_keywords, classify_client_error};
use crate::error::ModelClientError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies the keyword fallback recognises typical provider phrasing.
///
/// **WHY THIS MATTERS**: Failures that reach the classifier as plain text (no status, no
/// transport flags) can only be categorised by their wording.
///
/// **BUG THIS CATCHES**: Would catch a broken regex that silently sends everything to
/// UnknownError.
#[test]
fn given_typical_failure_texts_when_classified_by_keywords_then_match_expected_category() {
    // GIVEN / WHEN / THEN
    assert_eq!(
        classify_by_keywords("Incorrect API key provided: sk-abc"),
        ErrorCategory::CredentialError
    );
    assert_eq!(
        classify_by_keywords("request was Unauthorized"),
        ErrorCategory::CredentialError
    );
    assert_eq!(
        classify_by_keywords("TLS backend not installed"),
        ErrorCategory::DependencyError
    );
    assert_eq!(
        classify_by_keywords("Connection reset by peer"),
        ErrorCategory::NetworkError
    );
    assert_eq!(
        classify_by_keywords("operation timed out"),
        ErrorCategory::NetworkError
    );
    assert_eq!(
        classify_by_keywords("the model is overloaded"),
        ErrorCategory::UnknownError
    );
}

/// **VALUE**: Verifies priority when a text matches more than one category.
///
/// **WHY THIS MATTERS**: "network error while validating API key" is about the key
/// being checked, and the credential remediation is the one users can act on first.
///
/// **BUG THIS CATCHES**: Would catch a reordering of the keyword checks.
#[test]
fn given_text_matching_credential_and_network_when_classified_then_credential_wins() {
    let category = classify_by_keywords("network error while validating api_key");

    assert_eq!(category, ErrorCategory::CredentialError);
}

/// **VALUE**: Verifies that a transport error without timeout/connect flags has no
/// structured category.
///
/// **WHY THIS MATTERS**: Those are the only client errors that fall through to the
/// keyword heuristic. Returning Some here would bypass it.
///
/// **BUG THIS CATCHES**: Would catch `then_some` being replaced with an unconditional
/// NetworkError.
#[test]
fn given_unflagged_transport_error_when_classified_structurally_then_returns_none() {
    // GIVEN: A transport error with neither flag
    let error = ModelClientError::Transport {
        message: "error sending request".to_string(),
        is_timeout: false,
        is_connect: false,
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN / THEN
    assert_eq!(classify_client_error(&error), None);
}

/// **VALUE**: Verifies provider error codes count as credential signals even on a 400.
///
/// **WHY THIS MATTERS**: Some OpenAI-compatible gateways answer a bad key with 400 and
/// `code: invalid_api_key`.
///
/// **BUG THIS CATCHES**: Would catch classification that looks only at the status code.
#[test]
fn given_400_with_invalid_api_key_code_when_classified_then_credential_error() {
    let error = ModelClientError::from_status(
        400,
        "bad request",
        Some("invalid_api_key".to_string()),
        None,
    );

    assert_eq!(
        classify_client_error(&error),
        Some(ErrorCategory::CredentialError)
    );
}

/// **VALUE**: Verifies gateway status codes are network failures and other statuses are
/// structured-unknown.
///
/// **WHY THIS MATTERS**: A 500 whose body happens to mention "connection" must not be
/// reported as a connectivity problem: the status is the authoritative signal.
///
/// **BUG THIS CATCHES**: Would catch keyword fallback being applied to status errors.
#[test]
fn given_status_errors_when_classified_then_status_decides() {
    let gateway = ModelClientError::from_status(503, "upstream unavailable", None, None);
    let server = ModelClientError::from_status(500, "connection pool exhausted", None, None);

    assert_eq!(
        classify_client_error(&gateway),
        Some(ErrorCategory::NetworkError)
    );
    assert_eq!(
        classify_client_error(&server),
        Some(ErrorCategory::UnknownError)
    );
}

/// **VALUE**: Verifies only a failure to build the HTTP client is a dependency error.
///
/// **WHY THIS MATTERS**: "Check your installation" is only right when the TLS backend or
/// system resources are missing; a bad key or a bad single request needs other advice.
///
/// **BUG THIS CATCHES**: Would catch request-level or credential failures being folded
/// back into `ClientBuild`.
#[test]
fn given_build_failures_when_classified_then_only_client_build_is_dependency() {
    let location = ErrorLocation::from(Location::caller());
    let client_build = ModelClientError::ClientBuild {
        message: "no TLS backend".to_string(),
        location,
    };
    let request_build = ModelClientError::RequestBuild {
        message: "builder error".to_string(),
        location,
    };
    let invalid_credential = ModelClientError::InvalidCredential {
        message: "header".to_string(),
        location,
    };

    assert_eq!(
        classify_client_error(&client_build),
        Some(ErrorCategory::DependencyError)
    );
    assert_eq!(
        classify_client_error(&request_build),
        Some(ErrorCategory::UnknownError)
    );
    assert_eq!(
        classify_client_error(&invalid_credential),
        Some(ErrorCategory::CredentialError)
    );
}
