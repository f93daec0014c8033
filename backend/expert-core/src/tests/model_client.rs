// Unit tests for model client helpers
// HTTP behaviour against a mock server is in integration_tests/model_client.rs

use crate::credential::Credential;
use crate::error::ModelClientError;
use crate::error::model_client::describe_chain;
use crate::model_client::{authorization_header, error_from_body, parse_endpoint};

use std::fmt;

/// **VALUE**: Verifies the provider's error envelope is unpacked into structured fields.
///
/// **WHY THIS MATTERS**: `code` and `type` are what the classifier prefers over the
/// message text.
///
/// **BUG THIS CATCHES**: Would catch the `type` rename being dropped from ProviderError.
#[test]
fn given_openai_error_envelope_when_converted_then_keeps_code_type_and_message() {
    // GIVEN: A standard error body
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;

    // WHEN: Converting
    let error = error_from_body(401, body);

    // THEN: Structured fields are populated
    match error {
        ModelClientError::Status {
            status_code,
            message,
            provider_code,
            provider_type,
            ..
        } => {
            assert_eq!(status_code.0, 401);
            assert_eq!(message, "Incorrect API key provided");
            assert_eq!(provider_code.as_deref(), Some("invalid_api_key"));
            assert_eq!(provider_type.as_deref(), Some("invalid_request_error"));
        }
        other => panic!("Expected Status, got {other:?}"),
    }
}

/// **VALUE**: Verifies non-JSON and empty bodies still produce a useful message.
///
/// **WHY THIS MATTERS**: Proxies return HTML or nothing at all; the user still needs
/// some detail text.
///
/// **BUG THIS CATCHES**: Would catch an empty detail string reaching the presentation layer.
#[test]
fn given_plain_or_empty_body_when_converted_then_message_is_body_or_status() {
    let plain = error_from_body(502, "  Bad Gateway  ");
    let empty = error_from_body(504, "");

    assert_eq!(plain.message(), "Bad Gateway");
    assert_eq!(empty.message(), "HTTP 504");
}

/// **VALUE**: Verifies endpoints are normalised to end with a slash.
///
/// **WHY THIS MATTERS**: `Url::join` replaces the last path segment when there is no
/// trailing slash, which would turn `/v1` into `/chat/completions`.
///
/// **BUG THIS CATCHES**: Would catch requests silently going to the wrong path.
#[test]
fn given_endpoint_without_trailing_slash_when_parsed_then_join_keeps_version_segment() {
    let url = parse_endpoint("https://api.example.com/v1").unwrap();

    let joined = url.join("chat/completions").unwrap();

    assert_eq!(joined.as_str(), "https://api.example.com/v1/chat/completions");
}

/// **VALUE**: Verifies non-HTTP schemes are rejected.
///
/// **WHY THIS MATTERS**: The model-client probe reports this as a configuration fault.
///
/// **BUG THIS CATCHES**: Would catch the scheme check being removed.
#[test]
fn given_non_http_endpoint_when_parsed_then_returns_url_parse_error() {
    let result = parse_endpoint("ftp://api.example.com/v1/");

    assert!(matches!(result, Err(ModelClientError::UrlParse { .. })));
}

#[derive(Debug)]
struct Layer {
    text: &'static str,
    cause: Option<Box<Layer>>,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl std::error::Error for Layer {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self
            .cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// **VALUE**: Verifies every cause in an error chain ends up in the message.
///
/// **WHY THIS MATTERS**: reqwest's top-level text is the same for a refused connection,
/// a DNS failure and a timeout; only the causes tell them apart.
///
/// **BUG THIS CATCHES**: Would catch the message being built from `to_string()` alone.
#[test]
fn given_nested_error_when_described_then_every_cause_included_once() {
    // GIVEN: Three layers, one repeating its cause's text
    let error = Layer {
        text: "error sending request",
        cause: Some(Box::new(Layer {
            text: "client error (Connect)",
            cause: Some(Box::new(Layer {
                text: "Connection refused (os error 111)",
                cause: None,
            })),
        })),
    };

    // WHEN: Describing
    let message = describe_chain(&error);

    // THEN: All layers in order
    assert_eq!(
        message,
        "error sending request: client error (Connect): Connection refused (os error 111)"
    );
}

/// **VALUE**: Verifies header-unsafe credentials are rejected before any request.
///
/// **BUG THIS CATCHES**: Would catch the raw key leaking into the error text.
#[test]
fn given_credentials_when_header_built_then_control_characters_rejected() {
    let good = authorization_header(&Credential::new("sk-good-0123456789", "environment"));
    let bad = authorization_header(&Credential::new("sk-bad\r\n0123456789", "secret-store"));

    let good = good.unwrap();
    assert!(good.is_sensitive());
    assert_eq!(good.to_str().unwrap(), "Bearer sk-good-0123456789");

    match bad {
        Err(ModelClientError::InvalidCredential { message, .. }) => {
            assert!(message.contains("secret-store"));
            assert!(!message.contains("sk-bad"));
        }
        other => panic!("Expected InvalidCredential, got {other:?}"),
    }
}
