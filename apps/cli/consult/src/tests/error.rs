// Unit tests for error module

use crate::error::ConsultError;

use expert_core::error::{CoreError, PersonaError};

/// **VALUE**: Verifies core errors keep their message when wrapped.
///
/// **WHY THIS MATTERS**: The binary prints only the top-level error; the underlying
/// reason (e.g. which config value is invalid) must survive the conversion.
///
/// **BUG THIS CATCHES**: Would catch the From impl replacing the message with a
/// generic one.
#[test]
fn given_core_error_when_converted_then_message_kept() {
    // GIVEN: A core error
    let core = CoreError::from(PersonaError::unknown("astrologer"));
    let expected = core.to_string();

    // WHEN: Converting
    let err = ConsultError::from(core);

    // THEN: Core variant carrying the original text
    match &err {
        ConsultError::Core { message, .. } => assert_eq!(message, &expected),
        other => panic!("Expected Core, got {other:?}"),
    }
    assert!(err.to_string().starts_with("Core Error: "));
    assert!(err.to_string().contains("astrologer"));
}
