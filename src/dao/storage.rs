use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached (connection refused, pool closed, ping failed).
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend answered but the operation itself failed.
    #[error("storage operation failed: {message}")]
    Backend {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// An insert completed without handing back the stored row.
    #[error("insert failed: no row returned")]
    MissingInsertedRow,
    /// `DATABASE_URL` uses a scheme no compiled-in backend understands.
    #[error("unsupported database url scheme `{scheme}`")]
    UnsupportedScheme { scheme: String },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct an operation failure from any backend failure.
    pub fn backend(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Backend {
            message,
            source: Box::new(source),
        }
    }
}
