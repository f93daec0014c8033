pub mod config;
pub mod credential;
pub mod model_client;
pub mod persona;

pub use config::ConfigError;
pub use credential::{CredentialLookupError, KeyValidationFailure};
pub use model_client::ModelClientError;
pub use persona::PersonaError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Credential(#[from] credential::CredentialLookupError),

    #[error(transparent)]
    ModelClient(#[from] model_client::ModelClientError),

    #[error(transparent)]
    Persona(#[from] persona::PersonaError),
}
