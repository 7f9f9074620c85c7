use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to allocate the next match identifier")]
    NextId {
        #[source]
        source: MongoError,
    },
    #[error("failed to list matches")]
    ListMatches {
        #[source]
        source: MongoError,
    },
    #[error("failed to load match `{id}`")]
    LoadMatch {
        id: i32,
        #[source]
        source: MongoError,
    },
    #[error("failed to clear existing matches")]
    ClearMatches {
        #[source]
        source: MongoError,
    },
    #[error("failed to insert match `{id}`")]
    InsertMatch {
        id: i32,
        #[source]
        source: MongoError,
    },
    #[error("insert failed: no row returned")]
    InsertReturnedNothing,
    #[error("failed to update match `{id}`")]
    UpdateMatch {
        id: i32,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete match `{id}`")]
    DeleteMatch {
        id: i32,
        #[source]
        source: MongoError,
    },
}
