use thiserror::Error;
use crate::customer_actor::CustomerError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::record_store::RecordStoreError;

/// Errors that end the interactive session.
///
/// Anything the shop operator can recover from (unknown ids, short stock,
/// duplicate ids) is reported on the console instead and never becomes an
/// `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid {field}: '{input}' is not {expected}")]
    InvalidInput {
        field: &'static str,
        input: String,
        expected: &'static str,
    },
    #[error("input closed")]
    InputClosed,
    #[error(transparent)]
    RecordStore(#[from] RecordStoreError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Customer(#[from] CustomerError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("console io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("background task failed: {0}")]
    Task(String),
}
