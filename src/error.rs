//! Service-level error taxonomy.

use adoptme_db::StoreError;
use adoptme_http::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced user, pet or adoption does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request contradicts current state, e.g. adopting an adopted pet.
    #[error("{0}")]
    Conflict(String),

    /// Required input is missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Internal(#[from] StoreError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => AppError::not_found(message),
            ServiceError::Conflict(message) => AppError::conflict(message),
            ServiceError::Validation(message) => AppError::validation(message),
            ServiceError::Internal(source) => AppError::Internal(source.into()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
