//! HTTP status code utilities for failure classification.

/// HTTP status code returned by a provider.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// The provider rejected the credential (unauthenticated or forbidden).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.0, 401 | 403)
    }

    /// Codes produced by gateways and timeouts rather than by the provider's
    /// judgement of the request.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self.0, 408 | 502 | 503 | 504)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
