use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PersonaError {
    #[error("Unknown Persona Error: '{persona_id}' is not a known persona {location}")]
    UnknownPersona {
        persona_id: String,
        location: ErrorLocation,
    },
}

impl PersonaError {
    #[track_caller]
    pub fn unknown(persona_id: impl Into<String>) -> Self {
        PersonaError::UnknownPersona {
            persona_id: persona_id.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
