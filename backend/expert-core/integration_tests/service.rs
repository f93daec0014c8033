use crate::support::{FakeModelClient, available_snapshot, status, test_credential};

use expert_core::classifier::ErrorCategory;
use expert_core::environment::{
    CREDENTIAL_LOOKUP_CAPABILITY, CapabilityState, EnvironmentSnapshot, MODEL_CLIENT_CAPABILITY,
};
use expert_core::error::ModelClientError;
use expert_core::model_client::ChatRole;
use expert_core::service::{DispatchSettings, build_messages};
use expert_core::{Credential, ExpertResponseService, PersonaId, PersonaRegistry};

use common::ErrorLocation;

use std::panic::Location;

fn service(client: FakeModelClient) -> ExpertResponseService<FakeModelClient> {
    ExpertResponseService::new(client, DispatchSettings::default())
}

/// **VALUE**: Verifies a successful dispatch returns the model text verbatim, tagged
/// with the persona, and sends the configured model and temperature.
///
/// **WHY THIS MATTERS**: This is the happy path every user action goes through.
///
/// **BUG THIS CATCHES**: Would catch trimming/truncation of the answer or the wrong
/// sampling settings reaching the client.
#[tokio::test]
async fn given_valid_request_when_answered_then_returns_verbatim_text_for_persona() {
    // GIVEN: A client answering with surrounding whitespace and markdown
    let answer = "  ### Plan\n\n1. Update your CV\n";
    let client = FakeModelClient::answering(answer);
    let calls = client.calls();
    let service = service(client);
    let credential = test_credential();

    // WHEN: Asking the career coach
    let response = service
        .answer(
            "career-coach",
            "How do I switch careers?",
            Some(&credential),
            &available_snapshot(),
        )
        .await;

    // THEN: Verbatim answer tagged with the persona and model
    let answer_value = response.unwrap();
    assert_eq!(answer_value.answer_text, answer);
    assert_eq!(answer_value.persona, PersonaId::CareerCoach);
    assert_eq!(answer_value.model, "gpt-3.5-turbo");

    // AND: One call with the fixed sampling settings
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].model, "gpt-3.5-turbo");
    assert!((calls[0].temperature - 0.3).abs() < f32::EPSILON);
    assert_eq!(calls[0].credential_source, "environment");

    // AND: The payload sent is the persona's system instruction plus the labelled query
    let persona = PersonaRegistry::global().by_id(PersonaId::CareerCoach);
    assert_eq!(
        calls[0].messages,
        build_messages(persona, "How do I switch careers?")
    );
}

/// **VALUE**: Verifies the payload is (system = instruction, user = header + query).
///
/// **WHY THIS MATTERS**: The model only knows which persona to play from these two
/// messages.
///
/// **BUG THIS CATCHES**: Would catch the instruction being decorated, or the query being
/// trimmed or rewritten.
#[test]
fn given_persona_and_query_when_messages_built_then_system_is_instruction_and_user_has_query() {
    // GIVEN: A persona and a query with odd spacing
    let persona = PersonaRegistry::global().by_id(PersonaId::FinancialAdvisor);
    let query = "  Should I pay off my loan early?  ";

    // WHEN: Building the payload
    let messages = build_messages(persona, query);

    // THEN: Exactly two messages in system, user order
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[0].content, persona.system_instruction);
    assert_eq!(messages[1].role, ChatRole::User);
    assert!(messages[1].content.contains(query));
    assert!(messages[1].content.contains(persona.display_name));
}

/// **VALUE**: Verifies whitespace-only questions are rejected before dispatch.
///
/// **WHY THIS MATTERS**: Sending an empty prompt costs a request and returns nonsense.
///
/// **BUG THIS CATCHES**: Would catch `is_empty()` being used without `trim()`.
#[tokio::test]
async fn given_blank_query_when_answered_then_empty_query_and_no_call() {
    let client = FakeModelClient::answering("unused");
    let calls = client.calls();
    let service = service(client);
    let credential = test_credential();

    for query in ["", "   ", "\n\t "] {
        let error = service
            .answer("career-coach", query, Some(&credential), &available_snapshot())
            .await
            .unwrap_err();

        assert_eq!(error.category, ErrorCategory::EmptyQuery);
    }
    assert!(calls.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies the credential check precedes the query check.
///
/// **WHY THIS MATTERS**: The user must fix the missing key first; telling them to type
/// a question would be misleading.
///
/// **BUG THIS CATCHES**: Would catch a reordering of the preconditions.
#[tokio::test]
async fn given_no_credential_and_empty_query_when_answered_then_missing_credential() {
    let service = service(FakeModelClient::answering("unused"));

    let absent = service
        .answer("career-coach", "  ", None, &available_snapshot())
        .await
        .unwrap_err();

    let blank_credential = Credential::new("   ", "environment");
    let blank = service
        .answer("career-coach", "", Some(&blank_credential), &available_snapshot())
        .await
        .unwrap_err();

    assert_eq!(absent.category, ErrorCategory::MissingCredential);
    assert_eq!(blank.category, ErrorCategory::MissingCredential);
}

/// **VALUE**: Verifies the first unavailable capability, in check order, is reported.
///
/// **WHY THIS MATTERS**: The presentation layer shows one remediation; it must be for the
/// capability that is checked first.
///
/// **BUG THIS CATCHES**: Would catch capability failures being ignored, or reported in
/// an unstable order.
#[tokio::test]
async fn given_unavailable_capabilities_when_answered_then_first_one_is_reported() {
    // GIVEN: Model client faulted and credential lookup missing
    let snapshot = EnvironmentSnapshot::new(vec![
        status(MODEL_CLIENT_CAPABILITY, CapabilityState::Faulted, Some("bad endpoint")),
        status(CREDENTIAL_LOOKUP_CAPABILITY, CapabilityState::Missing, Some("no config dir")),
    ]);
    let client = FakeModelClient::answering("unused");
    let calls = client.calls();
    let service = service(client);

    // WHEN: Answering
    let error = service
        .answer("it-consultant", "Cloud or on-prem?", Some(&test_credential()), &snapshot)
        .await
        .unwrap_err();

    // THEN: CapabilityUnavailable naming the model client and its state
    assert_eq!(error.category, ErrorCategory::CapabilityUnavailable);
    assert!(error.detail.contains(MODEL_CLIENT_CAPABILITY));
    assert!(error.detail.contains("faulted"));
    assert!(calls.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies unknown personas fail after the other preconditions pass.
///
/// **WHY THIS MATTERS**: No request may be dispatched without a persona frame.
///
/// **BUG THIS CATCHES**: Would catch a default persona being substituted.
#[tokio::test]
async fn given_unknown_persona_when_answered_then_unknown_persona_and_no_call() {
    let client = FakeModelClient::answering("unused");
    let calls = client.calls();
    let service = service(client);

    let error = service
        .answer("astrologer", "Will I be rich?", Some(&test_credential()), &available_snapshot())
        .await
        .unwrap_err();

    assert_eq!(error.category, ErrorCategory::UnknownPersona);
    assert!(error.detail.contains("astrologer"));
    assert!(calls.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies an authentication rejection from the provider is a CredentialError.
///
/// **WHY THIS MATTERS**: The remediation for a revoked or mistyped key is to fix the key,
/// not to check the network.
///
/// **BUG THIS CATCHES**: Would catch auth failures being classified as Network/Unknown.
#[tokio::test]
async fn given_client_auth_failure_when_answered_then_credential_error_with_detail() {
    let service = service(FakeModelClient::failing(|| {
        ModelClientError::from_status(401, "Incorrect API key provided", None, None)
    }));

    let error = service
        .answer("medical-advisor", "Is coffee bad for sleep?", Some(&test_credential()), &available_snapshot())
        .await
        .unwrap_err();

    assert_eq!(error.category, ErrorCategory::CredentialError);
    assert_eq!(error.detail, "Incorrect API key provided");
}

/// **VALUE**: Verifies connectivity failures are NetworkErrors.
///
/// **WHY THIS MATTERS**: Offline users should be told to check their connection.
///
/// **BUG THIS CATCHES**: Would catch transport flags being ignored by the classifier.
#[tokio::test]
async fn given_client_connect_failure_when_answered_then_network_error() {
    let service = service(FakeModelClient::failing(|| ModelClientError::Transport {
        message: "error trying to connect: dns error".to_string(),
        is_timeout: false,
        is_connect: true,
        location: ErrorLocation::from(Location::caller()),
    }));

    let error = service
        .answer(
            "psychological-counselor",
            "I feel anxious",
            Some(&test_credential()),
            &available_snapshot(),
        )
        .await
        .unwrap_err();

    assert_eq!(error.category, ErrorCategory::NetworkError);
}
