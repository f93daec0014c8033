// Unit tests for action execution against an in-memory gateway

use crate::args::Action;
use crate::commands::execute;

use expert_core::credential::{CredentialSource, ENVIRONMENT_SOURCE};
use expert_core::error::{CredentialLookupError, ModelClientError};
use expert_core::{
    ChatRequest, ConsultationGateway, Credential, CredentialResolver, EnvironmentValidator,
    GatewayConfig, ModelClient,
};

struct FixedSource;

impl CredentialSource for FixedSource {
    fn name(&self) -> &'static str {
        ENVIRONMENT_SOURCE
    }

    fn lookup(&self, _key: &str) -> Result<Option<String>, CredentialLookupError> {
        Ok(Some("sk-commands-0123456789abcdef".to_string()))
    }
}

struct EchoClient;

impl ModelClient for EchoClient {
    async fn invoke(
        &self,
        request: &ChatRequest<'_>,
        _credential: &Credential,
    ) -> Result<String, ModelClientError> {
        Ok(format!("echo: {}", request.messages.len()))
    }
}

fn gateway() -> ConsultationGateway<EchoClient> {
    ConsultationGateway::new(
        &GatewayConfig::default(),
        CredentialResolver::new("OPENAI_API_KEY", vec![Box::new(FixedSource)]),
        EnvironmentValidator::new(Vec::new()),
        EchoClient,
    )
}

/// **VALUE**: Verifies a successful consultation prints the answer and succeeds.
///
/// **BUG THIS CATCHES**: Would catch the answer being rendered under the wrong persona.
#[tokio::test]
async fn given_known_persona_when_asked_then_answer_printed() {
    let outcome = execute(
        &gateway(),
        Action::Ask {
            persona: "career-coach".to_string(),
            question: "Should I change jobs?".to_string(),
        },
    )
    .await;

    assert!(outcome.success);
    assert!(outcome.output.contains("キャリアコーチ"));
    assert!(outcome.output.contains("echo: 2"));
}

/// **VALUE**: Verifies a rejected consultation prints the hint and reports failure.
///
/// **WHY THIS MATTERS**: Scripts rely on the exit code to detect failures.
///
/// **BUG THIS CATCHES**: Would catch failures being printed but exiting 0.
#[tokio::test]
async fn given_unknown_persona_when_asked_then_failure_with_hint() {
    let outcome = execute(
        &gateway(),
        Action::Ask {
            persona: "astrologer".to_string(),
            question: "Will I be rich?".to_string(),
        },
    )
    .await;

    assert!(!outcome.success);
    assert!(outcome.output.contains("UnknownPersona"));
    assert!(outcome.output.contains("consult --list"));
}

#[tokio::test]
async fn given_list_and_status_actions_when_executed_then_succeed() {
    let gateway = gateway();

    let list = execute(&gateway, Action::List).await;
    let status = execute(&gateway, Action::Status).await;

    assert!(list.success);
    assert!(list.output.contains("psychological-counselor"));
    assert!(status.success);
    assert!(status.output.contains("sk-co*****"));
    assert!(!status.output.contains("sk-commands-0123456789abcdef"));
}

/// **VALUE**: Verifies the missing-credential hint printed by `ask` names the key the
/// gateway was configured with.
///
/// **WHY THIS MATTERS**: Following a hint that names the wrong variable leaves the user
/// exactly where they started.
///
/// **BUG THIS CATCHES**: Would catch the command layer not passing the gateway's key
/// name through to rendering.
#[tokio::test]
async fn given_custom_key_name_and_no_credential_when_asked_then_hint_names_key() {
    // GIVEN: A gateway reading MY_PROVIDER_KEY from no sources
    let gateway = ConsultationGateway::new(
        &GatewayConfig::default(),
        CredentialResolver::new("MY_PROVIDER_KEY", Vec::new()),
        EnvironmentValidator::new(Vec::new()),
        EchoClient,
    );

    // WHEN: Asking a question
    let outcome = execute(
        &gateway,
        Action::Ask {
            persona: "career-coach".to_string(),
            question: "Should I change jobs?".to_string(),
        },
    )
    .await;

    // THEN: MissingCredential with a hint for the configured key
    assert!(!outcome.success);
    assert!(outcome.output.contains("MissingCredential"));
    assert!(outcome.output.contains("Set MY_PROVIDER_KEY"));
    assert!(!outcome.output.contains("OPENAI_API_KEY"));
}
