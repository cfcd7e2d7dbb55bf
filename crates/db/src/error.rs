use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by the document store and the typed stores built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection was never declared with `ensure_collection`.
    #[error("unknown collection '{collection}'")]
    UnknownCollection { collection: String },

    /// A document with the same `_id` already exists.
    #[error("document '{id}' already exists in '{collection}'")]
    Duplicate { collection: String, id: String },

    /// No document with the given `_id` exists.
    #[error("document '{id}' not found in '{collection}'")]
    Missing { collection: String, id: String },

    /// Document is not an object or lacks a string `_id`.
    #[error("invalid document: {message}")]
    InvalidDocument { message: String },

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("document store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn unknown_collection(collection: impl Into<String>) -> Self {
        Self::UnknownCollection {
            collection: collection.into(),
        }
    }

    pub fn duplicate(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Duplicate {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn missing(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Missing {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }
}
