//! Storage error types.

use nftkit_core::StorageBackend;

/// Boxed cause attached to wrapped backend failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by resources and storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A mandatory construction input was missing or empty.
    #[error("Required field missing: {0}")]
    RequiredField(&'static str),

    /// The resource content is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend does not support this operation.
    #[error("{operation} is not implemented for the {backend} backend")]
    NotImplemented {
        backend: StorageBackend,
        operation: &'static str,
    },

    /// A backend store/fetch failed; `source` is the original cause.
    #[error("{message}")]
    BackendOperation {
        message: String,
        #[source]
        source: BoxError,
    },

    /// Transport-level HTTP failure, passed through from the client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Inline image data is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub(crate) fn not_implemented(backend: StorageBackend, operation: &'static str) -> Self {
        Self::NotImplemented { backend, operation }
    }

    pub(crate) fn backend(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::BackendOperation {
            message: message.into(),
            source: source.into(),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;
