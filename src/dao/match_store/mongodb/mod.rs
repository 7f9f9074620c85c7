mod config;
mod connection;
mod error;
mod models;
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoMatchStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            err @ (MongoDaoError::InvalidUri { .. }
            | MongoDaoError::ClientConstruction { .. }
            | MongoDaoError::InitialPing { .. }
            | MongoDaoError::HealthPing { .. }) => StorageError::unavailable(err.to_string(), err),
            MongoDaoError::InsertReturnedNothing => StorageError::MissingInsertedRow,
            err => StorageError::backend(err.to_string(), err),
        }
    }
}
