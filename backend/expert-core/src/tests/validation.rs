// Unit tests for key format diagnostics

use crate::DEFAULT_PROVIDER_HOST;
use crate::credential::KeyValidator;
use crate::credential::validation::detect_placeholder;
use crate::error::KeyValidationFailure;

/// **VALUE**: Verifies that placeholder values copied from documentation are flagged.
///
/// **WHY THIS MATTERS**: `OPENAI_API_KEY=your-api-key` in a fresh `.env` is the most
/// common misconfiguration; flagging it saves a confusing 401.
///
/// **BUG THIS CATCHES**: Would catch the pattern table being emptied or made
/// case-sensitive.
#[test]
fn given_placeholder_values_when_detected_then_pattern_is_named() {
    assert_eq!(detect_placeholder("sk-YOUR-API-KEY-here"), Some("your-api-key"));
    assert_eq!(detect_placeholder("sk-xxxxxxxxxxxxxxxx"), Some("xxx"));
    assert_eq!(detect_placeholder("aaaaaaaaaaaa"), Some("repeated_char"));
    assert_eq!(detect_placeholder("sk-proj-9fQ2mZ7rT1"), None);
}

/// **VALUE**: Verifies the OpenAI rules flag a wrong prefix and accept a realistic key.
///
/// **WHY THIS MATTERS**: Pasting a key from another provider is caught before the
/// request goes out.
///
/// **BUG THIS CATCHES**: Would catch the host match falling through to generic rules.
#[test]
fn given_openai_host_when_checking_keys_then_prefix_rule_applies() {
    let validator = KeyValidator::for_host(DEFAULT_PROVIDER_HOST);

    assert_eq!(validator.check_value("sk-proj-9fQ2mZ7rT1kL0pW4vB8n"), None);
    assert!(matches!(
        validator.check_value("AIzaSyD-9fQ2mZ7rT1kL0pW4vB8n"),
        Some(KeyValidationFailure::InvalidPrefix { expected: "sk-", .. })
    ));
}

/// **VALUE**: Verifies unknown hosts get permissive rules.
///
/// **WHY THIS MATTERS**: Self-hosted OpenAI-compatible servers use arbitrary tokens.
///
/// **BUG THIS CATCHES**: Would catch the `sk-` prefix being enforced for every endpoint.
#[test]
fn given_custom_host_when_checking_key_then_no_prefix_required() {
    let validator = KeyValidator::for_host("llm.internal.example");

    assert_eq!(validator.check_value("local-token-123456"), None);
    assert!(matches!(
        validator.check_value("short"),
        Some(KeyValidationFailure::TooShort { min: 10, actual: 5 })
    ));
}
