//! Error types for group resolution.
//!
//! Errors are organized by category the same way across the crate: resource
//! state, validation of stored content, backend failures, and bulk export
//! conditions raised by the group resolver itself.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for storage and resolution operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Bulk export errors
    #[error(transparent)]
    BulkExport(#[from] BulkExportError),
}

impl StorageError {
    /// Returns `true` if this error reports a missing group.
    pub fn is_group_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::BulkExport(BulkExportError::GroupNotFound { .. })
        )
    }

    /// Returns `true` if this error reports an observed cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorageError::BulkExport(BulkExportError::Cancelled { .. }))
    }
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("resource not found: {resource_type}/{id}")]
    NotFound { resource_type: String, id: String },

    /// The resource has been deleted.
    #[error("resource deleted: {resource_type}/{id}")]
    Gone {
        resource_type: String,
        id: String,
        deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    },
}

/// Errors related to the content of stored resources and references.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The resource content could not be interpreted.
    #[error("invalid resource {resource_type}/{id}: {message}")]
    InvalidResource {
        resource_type: String,
        id: String,
        message: String,
    },

    /// Invalid reference format.
    #[error("invalid reference '{reference}': {message}")]
    InvalidReference { reference: String, message: String },
}

/// Errors originating from the storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Errors raised while computing the scope of a group-level export.
#[derive(Error, Debug)]
pub enum BulkExportError {
    /// The specified group was not found.
    #[error("group not found: {group_id}")]
    GroupNotFound { group_id: String },

    /// Resolution was cancelled while expanding the given group.
    #[error("group resolution cancelled while expanding group {group_id}")]
    Cancelled { group_id: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}
