use crate::RedactedApiKey;

/// **VALUE**: Verifies that the masked form reveals exactly the fixed prefix plus length.
///
/// **WHY THIS MATTERS**: The status panel shows this string. Revealing more than the
/// prefix would leak the secret on screen.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one in the prefix or a missing length
/// indicator.
#[test]
fn given_long_key_when_masked_then_shows_prefix_fill_and_length() {
    // GIVEN: A realistic key
    let key = RedactedApiKey::new(String::from("sk-proj-abcdefghijklmnop"));

    // WHEN: Masking
    let masked = key.masked();

    // THEN: Prefix, fixed fill and length only
    assert_eq!(masked, "sk-pr*****(24 chars)");
    assert!(!masked.contains("abcdef"));
}

/// **VALUE**: Verifies that keys no longer than the prefix are fully hidden.
///
/// **WHY THIS MATTERS**: A 4-character value would otherwise be printed in full.
///
/// **BUG THIS CATCHES**: Would catch if `masked()` takes the prefix without checking
/// the key length.
#[test]
fn given_short_key_when_masked_then_reveals_nothing() {
    let key = RedactedApiKey::new(String::from("abcd"));

    assert_eq!(key.masked(), "*****(4 chars)");
}

/// **VALUE**: Verifies Debug/Display never print the key and serialization is refused.
///
/// **WHY THIS MATTERS**: Credentials flow through structs that are logged with `{:?}`
/// and status reports that are serialized.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug or Serialize replacing the manual
/// redacting impls.
#[test]
fn given_key_when_formatted_or_serialized_then_value_never_appears() {
    // GIVEN: A key
    let key = RedactedApiKey::new(String::from("sk-secret-value-123456"));

    // WHEN: Formatting and serializing
    let debug = format!("{key:?}");
    let display = format!("{key}");
    let json = serde_json::to_string(&key);

    // THEN: The value is never exposed
    assert!(!debug.contains("secret"));
    assert!(!display.contains("secret"));
    assert!(json.is_err(), "Serialization must be refused");
    assert_eq!(key.expose(), "sk-secret-value-123456");
}
