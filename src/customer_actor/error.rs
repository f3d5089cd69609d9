use thiserror::Error;
use crate::actor_framework::FrameworkError;

/// Errors that can occur during customer operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),
    #[error("Customer already exists: {0}")]
    AlreadyExists(String),
    #[error("Customer validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CustomerError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CustomerError::NotFound(id),
            FrameworkError::AlreadyExists(id) => CustomerError::AlreadyExists(id),
            FrameworkError::Rejected(reason) => CustomerError::ValidationError(reason),
            other => CustomerError::ActorCommunicationError(other.to_string()),
        }
    }
}
