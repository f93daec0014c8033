use super::support::status;

use expert_core::environment::CREDENTIAL_LOOKUP_CAPABILITY;
use expert_core::error::ModelClientError;
use expert_core::{CapabilityState, ErrorCategory, RawFailure, classify};

/// **VALUE**: Verifies every raw failure kind maps to its category.
///
/// **WHY THIS MATTERS**: The presentation layer chooses its remediation hint purely
/// from the category.
///
/// **BUG THIS CATCHES**: Would catch a mapping arm being reordered or dropped.
#[test]
fn given_each_raw_failure_kind_when_classified_then_expected_category() {
    let cases = [
        (RawFailure::CredentialAbsent, ErrorCategory::CredentialError),
        (
            RawFailure::Capability(status(
                CREDENTIAL_LOOKUP_CAPABILITY,
                CapabilityState::Missing,
                Some("no config dir"),
            )),
            ErrorCategory::DependencyError,
        ),
        (
            RawFailure::Client(ModelClientError::from_status(401, "Unauthorized", None, None)),
            ErrorCategory::CredentialError,
        ),
        (
            RawFailure::Message("Connection reset by peer".to_string()),
            ErrorCategory::NetworkError,
        ),
        (
            RawFailure::Message("No module named 'langchain'".to_string()),
            ErrorCategory::DependencyError,
        ),
    ];

    for (raw, expected) in cases {
        let description = format!("{raw:?}");
        assert_eq!(classify(raw).category, expected, "{description}");
    }
}

/// **VALUE**: Verifies unrecognised failures keep their text verbatim.
///
/// **WHY THIS MATTERS**: Unknown errors are only debuggable through their original text.
///
/// **BUG THIS CATCHES**: Would catch the detail being replaced by a generic message.
#[test]
fn given_unrecognised_text_when_classified_then_unknown_with_verbatim_detail() {
    let text = "The model produced an unexpected token at position 17";

    let classified = classify(RawFailure::Message(text.to_string()));

    assert_eq!(classified.category, ErrorCategory::UnknownError);
    assert_eq!(classified.detail, text);
    assert!(!classified.category.is_precondition());
}

/// **VALUE**: Verifies credential signals win over network signals in the same text.
///
/// **WHY THIS MATTERS**: "Connection refused: invalid api key" needs a key fix, not a
/// network check.
///
/// **BUG THIS CATCHES**: Would catch the priority order being inverted.
#[test]
fn given_text_matching_several_categories_when_classified_then_credential_first() {
    let classified = classify(RawFailure::Message(
        "connection closed: Incorrect API key provided".to_string(),
    ));

    assert_eq!(classified.category, ErrorCategory::CredentialError);
}

/// **VALUE**: Verifies the structured status takes precedence over the message text.
///
/// **WHY THIS MATTERS**: Providers word their messages freely; status codes are stable.
///
/// **BUG THIS CATCHES**: Would catch keywords being consulted before structure.
#[test]
fn given_server_error_mentioning_api_key_when_classified_then_structure_wins() {
    let error = ModelClientError::from_status(500, "api key service crashed", None, None);

    let classified = classify(RawFailure::Client(error));

    assert_eq!(classified.category, ErrorCategory::UnknownError);
    assert_eq!(classified.detail, "api key service crashed");
}

/// **VALUE**: Verifies precondition categories are flagged as such.
///
/// **WHY THIS MATTERS**: The CLI treats precondition failures as user input problems.
///
/// **BUG THIS CATCHES**: Would catch a new category being added without a flag.
#[test]
fn given_categories_when_checked_then_preconditions_flagged() {
    for category in [
        ErrorCategory::MissingCredential,
        ErrorCategory::EmptyQuery,
        ErrorCategory::UnknownPersona,
        ErrorCategory::CapabilityUnavailable,
    ] {
        assert!(category.is_precondition(), "{category}");
    }

    for category in [
        ErrorCategory::CredentialError,
        ErrorCategory::DependencyError,
        ErrorCategory::NetworkError,
        ErrorCategory::UnknownError,
    ] {
        assert!(!category.is_precondition(), "{category}");
    }
}
