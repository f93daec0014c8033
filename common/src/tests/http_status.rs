use crate::HttpStatusCode;

/// **VALUE**: Verifies which status codes count as credential rejection.
///
/// **WHY THIS MATTERS**: The error classifier maps these codes to a credential
/// remediation. A wrong answer sends users off to debug their network instead of
/// their API key.
///
/// **BUG THIS CATCHES**: Would catch if 401/403 drop out of the set, or if 400/429
/// sneak into it.
#[test]
fn given_status_codes_when_checked_for_auth_rejection_then_only_401_and_403_match() {
    // GIVEN / WHEN / THEN
    assert!(HttpStatusCode(401).is_auth_rejection());
    assert!(HttpStatusCode(403).is_auth_rejection());
    assert!(!HttpStatusCode(400).is_auth_rejection());
    assert!(!HttpStatusCode(429).is_auth_rejection());
    assert!(!HttpStatusCode(500).is_auth_rejection());
}

/// **VALUE**: Verifies gateway/timeout codes are recognised as transport failures.
///
/// **WHY THIS MATTERS**: A 502 from a proxy is a connectivity problem, not an
/// application error, and should be presented as such.
///
/// **BUG THIS CATCHES**: Would catch if plain 500 is misreported as a network issue.
#[test]
fn given_status_codes_when_checked_for_transport_failure_then_gateway_codes_match() {
    for code in [408, 502, 503, 504] {
        assert!(HttpStatusCode(code).is_transport_failure(), "{code} should match");
    }
    assert!(!HttpStatusCode(500).is_transport_failure());
    assert!(!HttpStatusCode(401).is_transport_failure());
    assert!(HttpStatusCode(500).is_server_error());
    assert!(HttpStatusCode(404).is_client_error());
}
