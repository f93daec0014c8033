use expert_core::config::GatewayConfig;
use expert_core::error::ConfigError;
use expert_core::{DEFAULT_CREDENTIAL_KEY, DEFAULT_MODEL_ID, DEFAULT_TEMPERATURE};

use std::fs;

use tempfile::TempDir;

/// **VALUE**: Verifies a missing config file yields the documented defaults.
///
/// **WHY THIS MATTERS**: First run has no config file; the gateway must still work
/// with just `OPENAI_API_KEY` set.
///
/// **BUG THIS CATCHES**: Would catch a missing file being reported as a read error.
#[test]
fn given_missing_file_when_loaded_then_defaults() {
    // GIVEN: A path that does not exist
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gateway.toml");

    // WHEN: Loading
    let config = GatewayConfig::load(&path).unwrap();

    // THEN: Defaults
    assert_eq!(config, GatewayConfig::default());
    assert_eq!(config.credential.key_name, DEFAULT_CREDENTIAL_KEY);
    assert_eq!(config.model.model_id, DEFAULT_MODEL_ID);
    assert!((config.model.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
    assert_eq!(config.model.request_timeout_secs, 60);
    assert!(config.validate().is_ok());
}

/// **VALUE**: Verifies a partial file overrides only what it names.
///
/// **WHY THIS MATTERS**: Users typically change one value (model id or endpoint).
///
/// **BUG THIS CATCHES**: Would catch missing `#[serde(default)]` on nested tables.
#[test]
fn given_partial_file_when_loaded_then_rest_defaulted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gateway.toml");
    fs::write(
        &path,
        "[model]\nmodel_id = \"gpt-4o-mini\"\nendpoint = \"http://localhost:8080/v1\"\n",
    )
    .unwrap();

    let config = GatewayConfig::load(&path).unwrap();

    assert_eq!(config.model.model_id, "gpt-4o-mini");
    assert_eq!(config.model.endpoint, "http://localhost:8080/v1");
    assert_eq!(config.credential.key_name, DEFAULT_CREDENTIAL_KEY);
    assert!((config.model.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
}

/// **VALUE**: Verifies out-of-range temperatures are rejected at load time.
///
/// **WHY THIS MATTERS**: Expert answers must stay consistent; a zero or high
/// temperature changes behavior silently.
///
/// **BUG THIS CATCHES**: Would catch an inclusive lower bound or a missing upper bound.
#[test]
fn given_invalid_temperature_when_loaded_then_validation_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gateway.toml");

    for temperature in ["0.0", "1.5", "-0.3"] {
        fs::write(&path, format!("[model]\ntemperature = {temperature}\n")).unwrap();

        let result = GatewayConfig::load(&path);

        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "temperature {temperature} should be rejected, got {result:?}"
        );
    }
}

/// **VALUE**: Verifies other invalid values are caught by `validate()`.
///
/// **WHY THIS MATTERS**: Bad values must fail at start-up, not at first submission.
///
/// **BUG THIS CATCHES**: Would catch a validation rule being dropped.
#[test]
fn given_invalid_values_when_validated_then_error() {
    let mut bad_version = GatewayConfig::default();
    bad_version.version = 0;

    let mut bad_key = GatewayConfig::default();
    bad_key.credential.key_name = "OPENAI API KEY".to_string();

    let mut bad_endpoint = GatewayConfig::default();
    bad_endpoint.model.endpoint = "ftp://example.com".to_string();

    let mut bad_model = GatewayConfig::default();
    bad_model.model.model_id = "  ".to_string();

    let mut bad_timeout = GatewayConfig::default();
    bad_timeout.model.request_timeout_secs = 0;

    for config in [bad_version, bad_key, bad_endpoint, bad_model, bad_timeout] {
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}

/// **VALUE**: Verifies malformed TOML is a parse error naming the file.
///
/// **WHY THIS MATTERS**: The user needs to know which file to fix.
///
/// **BUG THIS CATCHES**: Would catch parse errors silently falling back to defaults.
#[test]
fn given_malformed_toml_when_loaded_then_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gateway.toml");
    fs::write(&path, "[model\ntemperature = ").unwrap();

    match GatewayConfig::load(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}
