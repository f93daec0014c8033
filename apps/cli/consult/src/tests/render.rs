// Unit tests for text rendering

use crate::render::{answer, failure, persona_list, remediation_hint, status};

use expert_core::environment::{CREDENTIAL_LOOKUP_CAPABILITY, MODEL_CLIENT_CAPABILITY};
use expert_core::{
    CapabilityState, CapabilityStatus, ClassifiedError, CredentialSummary, EnvironmentSnapshot,
    ErrorCategory, ExpertAnswer, PersonaId, PersonaRegistry, StatusReport,
};

fn snapshot(lookup_state: CapabilityState) -> EnvironmentSnapshot {
    EnvironmentSnapshot::new(vec![
        CapabilityStatus {
            name: MODEL_CLIENT_CAPABILITY.to_string(),
            state: CapabilityState::Available,
            detail: None,
        },
        CapabilityStatus {
            name: CREDENTIAL_LOOKUP_CAPABILITY.to_string(),
            state: lookup_state,
            detail: (lookup_state != CapabilityState::Available)
                .then(|| "no config dir".to_string()),
        },
    ])
}

/// **VALUE**: Verifies every persona appears in the list, in registry order.
///
/// **WHY THIS MATTERS**: `--list` is how users discover valid persona ids.
///
/// **BUG THIS CATCHES**: Would catch the id column using the display name instead of
/// the key the user must type.
#[test]
fn given_registry_when_listed_then_every_id_in_order() {
    let output = persona_list(PersonaRegistry::global().iter());

    let positions: Vec<_> = PersonaId::ALL
        .iter()
        .map(|id| output.find(id.as_str()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    for persona in PersonaRegistry::global().iter() {
        assert!(output.contains(persona.display_name));
        assert!(output.contains(persona.guidance_hint));
    }
}

/// **VALUE**: Verifies the status view prints the masked key and never more.
///
/// **WHY THIS MATTERS**: Status output is what users paste into bug reports.
///
/// **BUG THIS CATCHES**: Would catch a render path printing a raw value.
#[test]
fn given_configured_credential_when_status_rendered_then_masked_and_states_shown() {
    // GIVEN: A report with a faulted capability and a configured credential
    let report = StatusReport {
        capabilities: snapshot(CapabilityState::Faulted),
        credential: CredentialSummary::Configured {
            source: "environment",
            masked: "sk-ab*****(30 chars)".to_string(),
            length: 30,
            warning: None,
        },
    };

    // WHEN: Rendering
    let output = status(&report);

    // THEN: States, detail and masked key present
    assert!(output.contains("model-client"));
    assert!(output.contains("faulted (no config dir)"));
    assert!(output.contains("sk-ab*****(30 chars)"));
    assert!(output.contains("source: environment"));
}

#[test]
fn given_absent_credential_when_status_rendered_then_key_name_and_hint() {
    let report = StatusReport {
        capabilities: snapshot(CapabilityState::Available),
        credential: CredentialSummary::Absent {
            key_name: "OPENAI_API_KEY".to_string(),
        },
    };

    let output = status(&report);

    assert!(output.contains("OPENAI_API_KEY is not set"));
    assert!(output.contains(&remediation_hint(
        ErrorCategory::MissingCredential,
        "OPENAI_API_KEY"
    )));
}

/// **VALUE**: Verifies a failure shows category, detail and the category's hint.
///
/// **WHY THIS MATTERS**: The hint is the user's only guidance on what to fix.
///
/// **BUG THIS CATCHES**: Would catch the detail being dropped from the output.
#[test]
fn given_classified_error_when_rendered_then_category_detail_and_hint() {
    let error = ClassifiedError::new(ErrorCategory::NetworkError, "connection refused");

    let output = failure(&error, "OPENAI_API_KEY");

    assert!(output.contains("NetworkError"));
    assert!(output.contains("connection refused"));
    assert!(output.contains(&remediation_hint(
        ErrorCategory::NetworkError,
        "OPENAI_API_KEY"
    )));
}

/// **VALUE**: Verifies the missing-credential hint names the configured key.
///
/// **WHY THIS MATTERS**: With `credential.key_name` changed, setting `OPENAI_API_KEY`
/// does nothing; the hint must say which variable the gateway actually reads.
///
/// **BUG THIS CATCHES**: Would catch the default key name being hardcoded in the hint.
#[test]
fn given_custom_key_name_when_missing_credential_rendered_then_hint_names_it() {
    // GIVEN: A missing-credential failure with a non-default key name
    let error = ClassifiedError::new(ErrorCategory::MissingCredential, "no credential");

    // WHEN: Rendering the failure and the absent-credential status
    let output = failure(&error, "MY_PROVIDER_KEY");
    let report = StatusReport {
        capabilities: snapshot(CapabilityState::Available),
        credential: CredentialSummary::Absent {
            key_name: "MY_PROVIDER_KEY".to_string(),
        },
    };
    let status_output = status(&report);

    // THEN: Both name the configured key, never the default
    assert!(output.contains("Set MY_PROVIDER_KEY in your environment"));
    assert!(status_output.contains("Set MY_PROVIDER_KEY in your environment"));
    assert!(!output.contains("OPENAI_API_KEY"));
    assert!(!status_output.contains("OPENAI_API_KEY"));
}

#[test]
fn given_answer_when_rendered_then_persona_heading_and_verbatim_text() {
    let persona = PersonaRegistry::global().by_id(PersonaId::CareerCoach);
    let expert_answer = ExpertAnswer {
        persona: PersonaId::CareerCoach,
        answer_text: "  Write down what you want.\n".to_string(),
        model: "gpt-3.5-turbo".to_string(),
    };

    let output = answer(persona, &expert_answer);

    assert!(output.starts_with(persona.icon));
    assert!(output.contains(persona.display_name));
    assert!(output.contains("  Write down what you want.\n"));
}
