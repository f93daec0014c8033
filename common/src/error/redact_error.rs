use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when a secret-bearing value is asked to leave the process.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Redaction Error: {type_name} cannot be serialized, use expose() explicitly {location}")]
    SerializationRefused {
        type_name: &'static str,
        location: ErrorLocation,
    },
}
