use super::support::test_credential;

use expert_core::error::ModelClientError;
use expert_core::{
    ChatMessage, ChatRequest, Credential, ErrorCategory, ModelClient, OpenAiChatClient,
    RawFailure, classify,
};

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a career coach."),
        ChatMessage::user("[Consultation for: キャリアコーチ]\n\nShould I switch jobs?"),
    ]
}

fn client_for(server: &MockServer) -> OpenAiChatClient {
    OpenAiChatClient::new(format!("{}/v1", server.uri()), TIMEOUT)
}

/// **VALUE**: Verifies the request shape and that the first choice's content is returned.
///
/// **WHY THIS MATTERS**: Any OpenAI-compatible server must accept exactly this request.
///
/// **BUG THIS CATCHES**: Would catch a dropped `/v1` path segment, a missing bearer
/// header, or the temperature not being sent.
#[tokio::test]
async fn given_successful_completion_when_invoked_then_content_returned() {
    // GIVEN: A server expecting the standard request
    let server = MockServer::start().await;
    let credential = test_credential();
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header(
            "authorization",
            format!("Bearer {}", credential.expose()).as_str(),
        ))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                { "role": "system", "content": "You are a career coach." },
                { "role": "user", "content": "[Consultation for: キャリアコーチ]\n\nShould I switch jobs?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "List what you want first." } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    // WHEN: Invoking
    let answer = client.invoke(&request, &credential).await.unwrap();

    // THEN: Verbatim content
    assert_eq!(answer, "List what you want first.");
}

/// **VALUE**: Verifies a 401 error envelope keeps its provider code and classifies as a
/// credential error.
///
/// **WHY THIS MATTERS**: An invalid key is the most common runtime failure.
///
/// **BUG THIS CATCHES**: Would catch non-2xx bodies being parsed as completions.
#[tokio::test]
async fn given_unauthorized_response_when_invoked_then_credential_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "message": "Incorrect API key provided: sk-test-****.",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    let error = client.invoke(&request, &test_credential()).await.unwrap_err();

    match &error {
        ModelClientError::Status {
            status_code,
            provider_code,
            ..
        } => {
            assert_eq!(status_code.0, 401);
            assert_eq!(provider_code.as_deref(), Some("invalid_api_key"));
        }
        other => panic!("Expected Status, got {other:?}"),
    }
    assert_eq!(error.message(), "Incorrect API key provided: sk-test-****.");
    assert_eq!(
        classify(RawFailure::Client(error)).category,
        ErrorCategory::CredentialError
    );
}

/// **VALUE**: Verifies a 2xx body without message content is a malformed response.
///
/// **WHY THIS MATTERS**: Returning an empty answer would look like the expert said nothing.
///
/// **BUG THIS CATCHES**: Would catch `None` content being mapped to an empty string.
#[tokio::test]
async fn given_completion_without_content_when_invoked_then_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    let error = client.invoke(&request, &test_credential()).await.unwrap_err();

    assert!(matches!(error, ModelClientError::MalformedResponse { .. }));
    assert_eq!(
        classify(RawFailure::Client(error)).category,
        ErrorCategory::UnknownError
    );
}

/// **VALUE**: Verifies a refused connection classifies as a network error.
///
/// **WHY THIS MATTERS**: Offline users need "check your connection", not "check your key".
///
/// **BUG THIS CATCHES**: Would catch transport flags being lost when the error is converted.
#[tokio::test]
async fn given_unreachable_server_when_invoked_then_network_error() {
    // GIVEN: Nothing listens on the discard port
    let client = OpenAiChatClient::new("http://127.0.0.1:9/v1", TIMEOUT);
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    // WHEN: Invoking
    let error = client.invoke(&request, &test_credential()).await.unwrap_err();

    // THEN: Transport failure, network category, cause kept in the detail
    assert!(matches!(error, ModelClientError::Transport { is_connect: true, .. }));
    let classified = classify(RawFailure::Client(error));
    assert_eq!(classified.category, ErrorCategory::NetworkError);
    assert!(
        classified.detail.to_lowercase().contains("refused"),
        "detail should name the cause: {}",
        classified.detail
    );
}

/// **VALUE**: Verifies a timeout and a refused connection produce different details.
///
/// **WHY THIS MATTERS**: Both are network errors, but "the server is slow" and "nothing
/// is listening" call for different fixes; the detail is the only place that says which.
///
/// **BUG THIS CATCHES**: Would catch the detail stopping at reqwest's top-level
/// "error sending request" text and dropping the cause chain.
#[tokio::test]
async fn given_slow_server_when_invoked_then_timeout_detail_differs_from_refused() {
    // GIVEN: A server slower than the client timeout
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let slow = OpenAiChatClient::new(format!("{}/v1", server.uri()), Duration::from_millis(200));
    let unreachable = OpenAiChatClient::new("http://127.0.0.1:9/v1", TIMEOUT);
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    // WHEN: Invoking both
    let timed_out = slow.invoke(&request, &test_credential()).await.unwrap_err();
    let refused = unreachable.invoke(&request, &test_credential()).await.unwrap_err();

    // THEN: Both network errors with distinguishable details
    assert!(matches!(timed_out, ModelClientError::Transport { is_timeout: true, .. }));
    assert!(timed_out.message().to_lowercase().contains("timed out"));
    assert_ne!(timed_out.message(), refused.message());
    assert_eq!(
        classify(RawFailure::Client(timed_out)).category,
        ErrorCategory::NetworkError
    );
}

/// **VALUE**: Verifies a credential that cannot be sent as a header is a credential
/// error, and nothing reaches the server.
///
/// **WHY THIS MATTERS**: A key pasted with a trailing newline or control character is a
/// key problem; telling the user to check their installation sends them the wrong way.
///
/// **BUG THIS CATCHES**: Would catch reqwest's request-builder failure being reported as
/// a dependency error with the bare text "builder error".
#[tokio::test]
async fn given_credential_with_control_character_when_invoked_then_credential_error() {
    // GIVEN: A server that must not be called and a key with an embedded newline
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let credential = Credential::new("sk-abc\ndef0123456789", "environment");
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    // WHEN: Invoking
    let error = client_for(&server)
        .invoke(&request, &credential)
        .await
        .unwrap_err();

    // THEN: Credential category, detail names the source but not the key
    assert!(matches!(error, ModelClientError::InvalidCredential { .. }));
    let classified = classify(RawFailure::Client(error));
    assert_eq!(classified.category, ErrorCategory::CredentialError);
    assert!(classified.detail.contains("environment"));
    assert!(!classified.detail.contains("sk-abc"));
}

/// **VALUE**: Verifies a client for an unusable endpoint can be constructed, and fails
/// only when used.
///
/// **WHY THIS MATTERS**: The gateway must exist to report the `model-client` capability
/// as faulted; failing at construction would hide the status panel.
///
/// **BUG THIS CATCHES**: Would catch eager endpoint parsing coming back into `new`.
#[tokio::test]
async fn given_unusable_endpoint_when_client_built_then_failure_deferred_to_use() {
    let client = OpenAiChatClient::new("https://", TIMEOUT);
    let messages = messages();
    let request = ChatRequest {
        model: "gpt-3.5-turbo",
        temperature: 0.3,
        messages: &messages,
    };

    assert_eq!(client.endpoint(), "https://");
    assert!(client.base_url().is_err());
    let error = client.invoke(&request, &test_credential()).await.unwrap_err();
    assert!(matches!(error, ModelClientError::UrlParse { .. }));
}

/// **VALUE**: Verifies the endpoint is normalised so joins keep the version segment.
///
/// **WHY THIS MATTERS**: `https://host/v1` and `https://host/v1/` must hit the same URL.
///
/// **BUG THIS CATCHES**: Would catch `Url::join` replacing the last path segment.
#[test]
fn given_endpoint_without_trailing_slash_when_built_then_slash_added() {
    let client = OpenAiChatClient::new("https://api.openai.com/v1", TIMEOUT);

    assert_eq!(
        client.base_url().unwrap().as_str(),
        "https://api.openai.com/v1/"
    );
}
