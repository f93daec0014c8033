use expert_core::credential::SecretStoreSource;
use expert_core::environment::{
    CREDENTIAL_LOOKUP_CAPABILITY, CapabilityProbe, CredentialLookupProbe,
    MODEL_CLIENT_CAPABILITY, ModelClientProbe, ProbeOutcome,
};
use expert_core::{CapabilityState, EnvironmentValidator, GatewayConfig};

use std::fs;
use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(5);
const KEY: &str = "EXPERT_GATEWAY_IT_LOOKUP_KEY";

fn validator(model: ModelClientProbe, lookup: CredentialLookupProbe) -> EnvironmentValidator {
    EnvironmentValidator::new(vec![Box::new(model), Box::new(lookup)])
}

/// **VALUE**: Verifies a healthy setup reports every capability available, in check order.
///
/// **WHY THIS MATTERS**: The status panel and the dispatch gate both read this snapshot.
///
/// **BUG THIS CATCHES**: Would catch a probe reporting a missing secrets file as a fault.
#[test]
#[serial]
fn given_healthy_setup_when_checked_then_all_available_in_order() {
    // GIVEN: Valid endpoint, store path with no file, no .env
    let dir = TempDir::new().unwrap();
    let validator = validator(
        ModelClientProbe::new("https://api.openai.com/v1/", TIMEOUT),
        CredentialLookupProbe::new(
            KEY,
            SecretStoreSource::with_path(dir.path().join("secrets.toml")),
            None,
        ),
    );

    // WHEN: Checking
    let snapshot = validator.check();

    // THEN: Both available, model client first
    assert!(snapshot.all_available());
    let names: Vec<_> = snapshot.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, [MODEL_CLIENT_CAPABILITY, CREDENTIAL_LOOKUP_CAPABILITY]);
    assert!(snapshot.iter().all(|s| s.detail.is_none()));
}

/// **VALUE**: Verifies repeated checks without environment changes agree.
///
/// **WHY THIS MATTERS**: Checks are side-effect free and re-run on every submission.
///
/// **BUG THIS CATCHES**: Would catch a probe mutating state (e.g. loading `.env`).
#[test]
#[serial]
fn given_unchanged_environment_when_checked_twice_then_equal_snapshots() {
    let dir = TempDir::new().unwrap();
    let validator = validator(
        ModelClientProbe::new("not a url", TIMEOUT),
        CredentialLookupProbe::new(
            KEY,
            SecretStoreSource::with_path(dir.path().join("secrets.toml")),
            None,
        ),
    );

    assert_eq!(validator.check(), validator.check());
}

/// **VALUE**: Verifies an unusable endpoint is `faulted` with a diagnostic.
///
/// **WHY THIS MATTERS**: The client library is present but misconfigured: configuration
/// remediation, not setup remediation.
///
/// **BUG THIS CATCHES**: Would catch endpoint errors being reported as `missing`.
#[test]
fn given_bad_endpoint_when_checked_then_model_client_faulted() {
    for endpoint in ["not a url", "ftp://example.com/v1"] {
        let probe = ModelClientProbe::new(endpoint, TIMEOUT);

        assert_eq!(probe.name(), MODEL_CLIENT_CAPABILITY);
        assert!(matches!(probe.probe(), ProbeOutcome::Faulted(_)));
    }
}

/// **VALUE**: Verifies a store with no determinable location is `missing`, and the
/// snapshot's first unavailable capability is it.
///
/// **WHY THIS MATTERS**: Headless hosts without a config dir need a setup hint.
///
/// **BUG THIS CATCHES**: Would catch `first_unavailable` ignoring check order.
#[test]
fn given_unlocated_store_when_checked_then_credential_lookup_missing() {
    let validator = validator(
        ModelClientProbe::new("https://api.openai.com/v1/", TIMEOUT),
        CredentialLookupProbe::new(KEY, SecretStoreSource::unlocated(), None),
    );

    let snapshot = validator.check();
    let first = snapshot.first_unavailable().unwrap();

    assert_eq!(first.name, CREDENTIAL_LOOKUP_CAPABILITY);
    assert_eq!(first.state, CapabilityState::Missing);
    assert!(first.detail.is_some());
}

/// **VALUE**: Verifies unreadable or invalid lookup inputs are `faulted`.
///
/// **WHY THIS MATTERS**: A corrupt secrets file or `.env` must surface before dispatch.
///
/// **BUG THIS CATCHES**: Would catch parse failures being swallowed by the probe.
#[test]
fn given_corrupt_store_or_dotenv_when_checked_then_credential_lookup_faulted() {
    let dir = TempDir::new().unwrap();

    // GIVEN: A corrupt secrets file
    let store_path = dir.path().join("secrets.toml");
    fs::write(&store_path, "= nope").unwrap();
    let corrupt_store =
        CredentialLookupProbe::new(KEY, SecretStoreSource::with_path(&store_path), None);

    // GIVEN: A fine store but an invalid .env
    let dotenv_path = dir.path().join(".env");
    fs::write(&dotenv_path, "OPENAI_API_KEY='unterminated\n").unwrap();
    let corrupt_dotenv = CredentialLookupProbe::new(
        KEY,
        SecretStoreSource::with_path(dir.path().join("absent.toml")),
        Some(dotenv_path),
    );

    // THEN: Both faulted
    assert!(matches!(corrupt_store.probe(), ProbeOutcome::Faulted(_)));
    assert!(matches!(corrupt_dotenv.probe(), ProbeOutcome::Faulted(_)));
}

/// **VALUE**: Verifies the standard validator wires both probes from config.
///
/// **WHY THIS MATTERS**: The CLI only ever builds the validator this way.
///
/// **BUG THIS CATCHES**: Would catch a probe being dropped from `from_config`.
#[test]
fn given_config_when_validator_built_then_both_capabilities_checked() {
    let dir = TempDir::new().unwrap();
    let mut config = GatewayConfig::default();
    config.credential.secret_store_path = Some(dir.path().join("secrets.toml"));

    let snapshot = EnvironmentValidator::from_config(&config).check();

    assert!(snapshot.get(MODEL_CLIENT_CAPABILITY).is_some());
    assert!(snapshot.get(CREDENTIAL_LOOKUP_CAPABILITY).is_some());
    assert_eq!(snapshot.as_map().len(), 2);
}

/// **VALUE**: Verifies the lookup check reads the configured key the way resolution will.
///
/// **WHY THIS MATTERS**: `--status` must not say `available` for a source that `submit`
/// will then fail to read.
///
/// **BUG THIS CATCHES**: Would catch the check only confirming the store file parses while
/// the key itself holds a non-string value.
#[test]
fn given_non_string_key_in_store_when_checked_then_credential_lookup_faulted() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("secrets.toml");
    fs::write(&store_path, format!("{KEY} = 42\n")).unwrap();

    let probe = CredentialLookupProbe::new(KEY, SecretStoreSource::with_path(&store_path), None);

    assert!(matches!(probe.probe(), ProbeOutcome::Faulted(_)));
}

/// **VALUE**: Verifies an unreadable environment variable makes credential lookup faulted.
///
/// **WHY THIS MATTERS**: The environment is a credential source too; a variable holding
/// invalid Unicode fails resolution and must show up in the status panel.
///
/// **BUG THIS CATCHES**: Would catch the check skipping the environment source.
#[cfg(unix)]
#[test]
#[serial]
fn given_non_unicode_environment_value_when_checked_then_credential_lookup_faulted() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    // GIVEN: The key set to bytes that are not UTF-8
    let dir = TempDir::new().unwrap();
    // SAFETY: every test touching KEY is #[serial].
    unsafe { std::env::set_var(KEY, OsStr::from_bytes(b"sk-\xff\xfe")) };
    let probe = CredentialLookupProbe::new(
        KEY,
        SecretStoreSource::with_path(dir.path().join("secrets.toml")),
        None,
    );

    // WHEN: Checking
    let outcome = probe.probe();
    // SAFETY: every test touching KEY is #[serial].
    unsafe { std::env::remove_var(KEY) };

    // THEN: Faulted, naming the key
    match outcome {
        ProbeOutcome::Faulted(detail) => assert!(detail.contains(KEY)),
        other => panic!("Expected Faulted, got {other:?}"),
    }
}
