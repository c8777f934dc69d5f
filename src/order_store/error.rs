use thiserror::Error;

use crate::store_framework::StoreError;

/// Errors surfaced by order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order already exists: {0}")]
    AlreadyExists(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<StoreError> for OrderError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => OrderError::ValidationError(msg),
            StoreError::DuplicateId(id) => OrderError::AlreadyExists(id),
            other => OrderError::StoreCommunicationError(other.to_string()),
        }
    }
}
