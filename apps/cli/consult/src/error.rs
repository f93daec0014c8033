use common::ErrorLocation;

use expert_core::error::CoreError;

use std::panic::Location;

use thiserror::Error;

/// Errors that stop the `consult` binary before a consultation result exists.
///
/// Consultation failures themselves are not errors here: they are rendered
/// from their category and only affect the exit code.
#[derive(Debug, Error)]
pub enum ConsultError {
    /// Error from this App
    #[error("Consult Error: {message} {location}")]
    Consult {
        message: String,
        location: ErrorLocation,
    },

    /// Error from expert-core (config, client construction)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Arguments do not name an action
    #[error("Usage Error: {message} {location}")]
    Usage {
        message: String,
        location: ErrorLocation,
    },
}

impl From<CoreError> for ConsultError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        ConsultError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
