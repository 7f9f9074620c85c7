mod error;
mod models;
pub mod store;

pub use error::PostgresDaoError;
pub use store::PostgresMatchStore;

use crate::dao::storage::StorageError;

impl From<PostgresDaoError> for StorageError {
    fn from(err: PostgresDaoError) -> Self {
        match err {
            err @ (PostgresDaoError::Connect { .. } | PostgresDaoError::HealthPing { .. }) => {
                StorageError::unavailable(err.to_string(), err)
            }
            PostgresDaoError::InsertReturnedNothing => StorageError::MissingInsertedRow,
            err => StorageError::backend(err.to_string(), err),
        }
    }
}
