//! Shared building blocks for the expert consultation gateway.
//!
//! Everything here is a leaf: no knowledge of personas, providers or the
//! presentation layer. The core crate and the CLI both depend on it.
//!
//! ## Contents
//!
//! - [`ErrorLocation`]: file/line/column captured at the point an error is built
//! - [`RedactedApiKey`]: a secret that never prints, serializes or outlives its drop
//! - [`HttpStatusCode`]: status classification without parsing error strings

pub mod error;
pub mod http_status;
pub mod redacted_key;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_key::RedactedApiKey;
