use expert_core::credential::{
    CredentialSource, ENVIRONMENT_SOURCE, EnvironmentSource, SECRET_STORE_SOURCE,
    SecretStoreSource,
};
use expert_core::error::CredentialLookupError;
use expert_core::CredentialResolver;

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

const KEY: &str = "EXPERT_GATEWAY_IT_CREDENTIAL";

fn set_env(value: &str) {
    // SAFETY: every test touching KEY is #[serial].
    unsafe { std::env::set_var(KEY, value) };
}

fn clear_env() {
    // SAFETY: every test touching KEY is #[serial].
    unsafe { std::env::remove_var(KEY) };
}

fn resolver(store: SecretStoreSource) -> CredentialResolver {
    CredentialResolver::new(KEY, vec![Box::new(store), Box::new(EnvironmentSource)])
}

fn store_with(dir: &TempDir, contents: &str) -> SecretStoreSource {
    let path = dir.path().join("secrets.toml");
    fs::write(&path, contents).unwrap();
    SecretStoreSource::with_path(path)
}

/// **VALUE**: Verifies an environment-only credential is found and tagged "environment".
///
/// **WHY THIS MATTERS**: Most installs only set the variable (often via `.env`).
///
/// **BUG THIS CATCHES**: Would catch a missing secrets file being treated as a failure.
#[test]
#[serial]
fn given_only_environment_value_when_resolved_then_tagged_environment() {
    // GIVEN: No secrets file, variable set
    let dir = TempDir::new().unwrap();
    let store = SecretStoreSource::with_path(dir.path().join("secrets.toml"));
    set_env("sk-env-value-0123456789");

    // WHEN: Resolving
    let credential = resolver(store).resolve().unwrap().unwrap();
    clear_env();

    // THEN: Environment value and tag
    assert_eq!(credential.expose(), "sk-env-value-0123456789");
    assert_eq!(credential.source_name(), ENVIRONMENT_SOURCE);
}

/// **VALUE**: Verifies the secret store wins when both sources have a value, even an
/// identical one.
///
/// **WHY THIS MATTERS**: Operators rely on the managed store overriding stray shell
/// variables.
///
/// **BUG THIS CATCHES**: Would catch sources being reordered, or value comparison
/// short-circuiting the provenance.
#[test]
#[serial]
fn given_store_and_environment_values_when_resolved_then_store_wins() {
    let dir = TempDir::new().unwrap();

    for env_value in ["sk-env-value-0123456789", "sk-store-value-0123456789"] {
        // GIVEN: Both sources populated
        let store = store_with(&dir, &format!("{KEY} = \"sk-store-value-0123456789\"\n"));
        set_env(env_value);

        // WHEN: Resolving
        let credential = resolver(store).resolve().unwrap().unwrap();
        clear_env();

        // THEN: Store value, store tag
        assert_eq!(credential.expose(), "sk-store-value-0123456789");
        assert_eq!(credential.source_name(), SECRET_STORE_SOURCE);
    }
}

/// **VALUE**: Verifies "nothing configured" is Ok(None), and blank values are skipped.
///
/// **WHY THIS MATTERS**: Unconfigured is a normal state the UI explains, not a crash.
///
/// **BUG THIS CATCHES**: Would catch a blank store entry shadowing the environment.
#[test]
#[serial]
fn given_blank_or_absent_values_when_resolved_then_next_source_or_none() {
    let dir = TempDir::new().unwrap();

    // GIVEN: Blank store value and no variable
    clear_env();
    let store = store_with(&dir, &format!("{KEY} = \"   \"\nOTHER = \"x\"\n"));
    assert!(resolver(store.clone()).resolve().unwrap().is_none());

    // GIVEN: Blank store value and a real variable
    set_env("  sk-env-padded-0123456789  ");
    let credential = resolver(store).resolve().unwrap().unwrap();
    clear_env();

    // THEN: Environment wins, value trimmed
    assert_eq!(credential.source_name(), ENVIRONMENT_SOURCE);
    assert_eq!(credential.expose(), "sk-env-padded-0123456789");
}

/// **VALUE**: Verifies a malformed secret store aborts resolution instead of falling
/// through to the environment.
///
/// **WHY THIS MATTERS**: Silently using a stale shell variable when the managed store is
/// broken hides the misconfiguration.
///
/// **BUG THIS CATCHES**: Would catch `?` being replaced by a skip on lookup errors.
#[test]
#[serial]
fn given_malformed_store_when_resolved_then_lookup_error() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, "this is = = not toml");
    set_env("sk-env-value-0123456789");

    let result = resolver(store).resolve();
    clear_env();

    match result {
        Err(e @ CredentialLookupError::SecretStoreParse { .. }) => {
            assert_eq!(e.source_name(), SECRET_STORE_SOURCE);
        }
        other => panic!("Expected SecretStoreParse, got {other:?}"),
    }
}

/// **VALUE**: Verifies a non-string value in the store is a parse error.
///
/// **WHY THIS MATTERS**: `KEY = 123` is a typo, not "no credential".
///
/// **BUG THIS CATCHES**: Would catch non-string values being stringified or ignored.
#[test]
fn given_non_string_store_value_when_looked_up_then_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, &format!("{KEY} = 123\n"));

    let result = store.lookup(KEY);

    assert!(matches!(result, Err(CredentialLookupError::SecretStoreParse { .. })));
}

/// **VALUE**: Verifies resolution is idempotent.
///
/// **WHY THIS MATTERS**: The gateway resolves on every submission and for the status
/// panel; both must agree.
///
/// **BUG THIS CATCHES**: Would catch hidden state (e.g. consuming the variable).
#[test]
#[serial]
fn given_unchanged_sources_when_resolved_twice_then_same_result() {
    let dir = TempDir::new().unwrap();
    set_env("sk-env-value-0123456789");
    let resolver = resolver(SecretStoreSource::with_path(dir.path().join("absent.toml")));

    let first = resolver.resolve().unwrap().unwrap();
    let second = resolver.resolve().unwrap().unwrap();
    clear_env();

    assert_eq!(first.expose(), second.expose());
    assert_eq!(first.source_name(), second.source_name());
}

/// **VALUE**: Verifies credential Debug output is redacted.
///
/// **WHY THIS MATTERS**: Credentials are passed around in structs that get logged.
///
/// **BUG THIS CATCHES**: Would catch a derived Debug exposing the raw key.
#[test]
#[serial]
fn given_resolved_credential_when_debug_formatted_then_value_hidden() {
    set_env("sk-very-secret-0123456789");
    let dir = TempDir::new().unwrap();
    let credential = resolver(SecretStoreSource::with_path(dir.path().join("none.toml")))
        .resolve()
        .unwrap()
        .unwrap();
    clear_env();

    let debug = format!("{credential:?}");

    assert!(!debug.contains("very-secret"));
    assert_eq!(credential.masked(), "sk-ve*****(25 chars)");
}
