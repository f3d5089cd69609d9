use thiserror::Error;
use crate::actor_framework::FrameworkError;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product already exists: {0}")]
    AlreadyExists(String),
    #[error("Stock change rejected: {0}")]
    StockRejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ProductError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::AlreadyExists(id) => ProductError::AlreadyExists(id),
            FrameworkError::Rejected(reason) => ProductError::StockRejected(reason),
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}
