use thiserror::Error;

use crate::store_framework::StoreError;

/// Errors surfaced by product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product already exists: {0}")]
    AlreadyExists(String),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Store communication error: {0}")]
    StoreCommunicationError(String),
}

impl From<StoreError> for ProductError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => ProductError::ValidationError(msg),
            StoreError::DuplicateId(id) => ProductError::AlreadyExists(id),
            other => ProductError::StoreCommunicationError(other.to_string()),
        }
    }
}
