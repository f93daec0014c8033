use super::support::FakeModelClient;

use expert_core::credential::{CredentialSource, SECRET_STORE_SOURCE};
use expert_core::environment::{
    CREDENTIAL_LOOKUP_CAPABILITY, CapabilityProbe, MODEL_CLIENT_CAPABILITY, ProbeOutcome,
};
use expert_core::error::{CredentialLookupError, KeyValidationFailure};
use expert_core::{
    CapabilityState, ConsultationGateway, CredentialResolver, CredentialSummary,
    EnvironmentValidator, ErrorCategory, GatewayConfig, PersonaId,
};

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

const KEY: &str = "OPENAI_API_KEY";
const VALID_KEY: &str = "sk-gateway-0123456789abcdef";

/// Source returning a fixed value, or failing.
struct FixedSource(Result<Option<&'static str>, &'static str>);

impl CredentialSource for FixedSource {
    fn name(&self) -> &'static str {
        SECRET_STORE_SOURCE
    }

    fn lookup(&self, _key: &str) -> Result<Option<String>, CredentialLookupError> {
        match self.0 {
            Ok(value) => Ok(value.map(str::to_string)),
            Err(reason) => Err(CredentialLookupError::secret_store_unavailable(reason)),
        }
    }
}

struct FixedProbe(&'static str, ProbeOutcome);

impl CapabilityProbe for FixedProbe {
    fn name(&self) -> &'static str {
        self.0
    }

    fn probe(&self) -> ProbeOutcome {
        self.1.clone()
    }
}

fn healthy_validator() -> EnvironmentValidator {
    EnvironmentValidator::new(vec![
        Box::new(FixedProbe(MODEL_CLIENT_CAPABILITY, ProbeOutcome::Available)),
        Box::new(FixedProbe(CREDENTIAL_LOOKUP_CAPABILITY, ProbeOutcome::Available)),
    ])
}

fn gateway(
    source: FixedSource,
    validator: EnvironmentValidator,
    client: FakeModelClient,
) -> ConsultationGateway<FakeModelClient> {
    ConsultationGateway::new(
        &GatewayConfig::default(),
        CredentialResolver::new(KEY, vec![Box::new(source)]),
        validator,
        client,
    )
}

/// **VALUE**: Verifies `submit` resolves the credential, checks the environment and
/// dispatches through the configured model.
///
/// **WHY THIS MATTERS**: This is the only call the presentation layer makes.
///
/// **BUG THIS CATCHES**: Would catch the gateway dispatching with stale or default
/// settings instead of the config.
#[tokio::test]
async fn given_healthy_gateway_when_submitted_then_answered() {
    // GIVEN: Credential in the store, everything available
    let client = FakeModelClient::answering("Start with a budget.");
    let calls = client.calls();
    let gateway = gateway(FixedSource(Ok(Some(VALID_KEY))), healthy_validator(), client);

    // WHEN: Submitting
    let answer = gateway
        .submit("financial-advisor", "How should I save?")
        .await
        .unwrap();

    // THEN: Answered by that persona, store credential used
    assert_eq!(answer.persona, PersonaId::FinancialAdvisor);
    assert_eq!(answer.answer_text, "Start with a budget.");
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].credential_source, SECRET_STORE_SOURCE);
    assert_eq!(calls[0].model, GatewayConfig::default().model.model_id);
}

/// **VALUE**: Verifies an absent credential stops the request before the client.
///
/// **WHY THIS MATTERS**: Without a key the provider call can only fail, and costs a
/// round trip to do so.
///
/// **BUG THIS CATCHES**: Would catch the gateway dispatching with an empty bearer token.
#[tokio::test]
async fn given_no_credential_when_submitted_then_missing_credential() {
    let client = FakeModelClient::answering("unused");
    let calls = client.calls();
    let gateway = gateway(FixedSource(Ok(None)), healthy_validator(), client);

    let error = gateway
        .submit("career-coach", "What next?")
        .await
        .unwrap_err();

    assert_eq!(error.category, ErrorCategory::MissingCredential);
    assert!(calls.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies a failing credential lookup is reported as the credential-lookup
/// capability being unavailable.
///
/// **WHY THIS MATTERS**: "Your secrets file is broken" needs different remediation from
/// "you have no key".
///
/// **BUG THIS CATCHES**: Would catch a lookup failure being reported as MissingCredential.
#[tokio::test]
async fn given_lookup_failure_when_submitted_then_capability_unavailable() {
    let client = FakeModelClient::answering("unused");
    let calls = client.calls();
    let gateway = gateway(
        FixedSource(Err("store offline")),
        healthy_validator(),
        client,
    );

    let error = gateway
        .submit("psychological-counselor", "I feel stuck")
        .await
        .unwrap_err();

    assert_eq!(error.category, ErrorCategory::CapabilityUnavailable);
    assert!(error.detail.contains(CREDENTIAL_LOOKUP_CAPABILITY));
    assert!(error.detail.contains("store offline"));
    assert!(calls.lock().unwrap().is_empty());
}

/// **VALUE**: Verifies a faulted capability blocks dispatch.
///
/// **WHY THIS MATTERS**: The gate is the gateway's job; callers must not need to check.
///
/// **BUG THIS CATCHES**: Would catch `submit` skipping the environment check.
#[tokio::test]
async fn given_faulted_capability_when_submitted_then_capability_unavailable() {
    let client = FakeModelClient::answering("unused");
    let validator = EnvironmentValidator::new(vec![Box::new(FixedProbe(
        MODEL_CLIENT_CAPABILITY,
        ProbeOutcome::Faulted("bad endpoint".to_string()),
    ))]);
    let gateway = gateway(FixedSource(Ok(Some(VALID_KEY))), validator, client);

    let error = gateway
        .submit("it-consultant", "Which database?")
        .await
        .unwrap_err();

    assert_eq!(error.category, ErrorCategory::CapabilityUnavailable);
    assert!(error.detail.contains("bad endpoint"));
}

/// **VALUE**: Verifies the status report shows only the masked credential.
///
/// **WHY THIS MATTERS**: The status panel is rendered to the terminal and may be
/// screenshotted or pasted into bug reports.
///
/// **BUG THIS CATCHES**: Would catch the raw key leaking through the report.
#[test]
fn given_configured_credential_when_status_reported_then_masked_only() {
    let gateway = gateway(
        FixedSource(Ok(Some(VALID_KEY))),
        healthy_validator(),
        FakeModelClient::answering("unused"),
    );

    let report = gateway.status_report();

    assert!(report.capabilities.all_available());
    match &report.credential {
        CredentialSummary::Configured {
            source,
            masked,
            length,
            warning,
        } => {
            assert_eq!(*source, SECRET_STORE_SOURCE);
            assert_eq!(masked, "sk-ga*****(27 chars)");
            assert_eq!(*length, VALID_KEY.len());
            assert!(warning.is_none());
        }
        other => panic!("Expected Configured, got {other:?}"),
    }
    assert!(!format!("{report:?}").contains(VALID_KEY));
}

/// **VALUE**: Verifies suspicious keys are flagged but not blocked.
///
/// **WHY THIS MATTERS**: Copy-pasted `.env.example` values are the most common setup
/// mistake; the user should see why the provider will reject them.
///
/// **BUG THIS CATCHES**: Would catch format checks being skipped in the report.
#[test]
fn given_placeholder_credential_when_status_reported_then_warning_attached() {
    let gateway = gateway(
        FixedSource(Ok(Some("sk-your-api-key-goes-here"))),
        healthy_validator(),
        FakeModelClient::answering("unused"),
    );

    match gateway.status_report().credential {
        CredentialSummary::Configured { warning, .. } => assert_eq!(
            warning,
            Some(KeyValidationFailure::PlaceholderDetected {
                pattern: "your-api-key"
            })
        ),
        other => panic!("Expected Configured, got {other:?}"),
    }
}

/// **VALUE**: Verifies absent and failing lookups are distinguished in the report.
///
/// **WHY THIS MATTERS**: Each state shows a different remediation line.
///
/// **BUG THIS CATCHES**: Would catch lookup errors being collapsed into "not configured".
#[test]
fn given_absent_or_failing_lookup_when_status_reported_then_distinguished() {
    let absent = gateway(
        FixedSource(Ok(None)),
        healthy_validator(),
        FakeModelClient::answering("unused"),
    );
    let failing = gateway(
        FixedSource(Err("store offline")),
        EnvironmentValidator::new(vec![Box::new(FixedProbe(
            CREDENTIAL_LOOKUP_CAPABILITY,
            ProbeOutcome::Missing("no config dir".to_string()),
        ))]),
        FakeModelClient::answering("unused"),
    );

    assert_eq!(
        absent.status_report().credential,
        CredentialSummary::Absent {
            key_name: KEY.to_string()
        }
    );

    let report = failing.status_report();
    assert!(matches!(
        report.credential,
        CredentialSummary::LookupFailed { .. }
    ));
    assert_eq!(
        report.capabilities.first_unavailable().map(|s| s.state),
        Some(CapabilityState::Missing)
    );
}

/// **VALUE**: Verifies the gateway lists every persona in declaration order.
///
/// **WHY THIS MATTERS**: The CLI's `--list` output is driven from here.
///
/// **BUG THIS CATCHES**: Would catch the gateway exposing a different registry.
#[test]
fn given_gateway_when_personas_listed_then_declaration_order() {
    let gateway = gateway(
        FixedSource(Ok(None)),
        healthy_validator(),
        FakeModelClient::answering("unused"),
    );

    let ids: Vec<_> = gateway.personas().map(|p| p.id).collect();

    assert_eq!(ids, PersonaId::ALL);
}

/// **VALUE**: Verifies a gateway built from config with an unusable endpoint still
/// exists, and reports the endpoint through the `model-client` capability.
///
/// **WHY THIS MATTERS**: `consult --status` is the tool for diagnosing a bad config; it
/// must not itself fail because the endpoint is bad.
///
/// **BUG THIS CATCHES**: Would catch `from_config` building the HTTP client eagerly and
/// returning its error, which makes the `faulted` state unreachable.
#[tokio::test]
#[serial]
async fn given_unusable_endpoint_when_built_from_config_then_model_client_faulted() {
    // GIVEN: A config that validates but whose endpoint has no host
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("secrets.toml");
    fs::write(&store, format!("{KEY} = \"{VALID_KEY}\"\n")).unwrap();
    let mut config = GatewayConfig::default();
    config.model.endpoint = "https://".to_string();
    config.credential.secret_store_path = Some(store);

    // WHEN: Building the production gateway
    let gateway = ConsultationGateway::from_config(&config).unwrap();

    // THEN: Status shows the faulted capability
    let report = gateway.status_report();
    let model_client = report.capabilities.get(MODEL_CLIENT_CAPABILITY).unwrap();
    assert_eq!(model_client.state, CapabilityState::Faulted);
    assert!(model_client.detail.is_some());

    // AND: Submitting is rejected before dispatch, naming the capability
    let error = gateway
        .submit("career-coach", "Should I change jobs?")
        .await
        .unwrap_err();
    assert_eq!(error.category, ErrorCategory::CapabilityUnavailable);
    assert!(error.detail.contains(MODEL_CLIENT_CAPABILITY));
    assert_eq!(gateway.credential_key_name(), KEY);
}
