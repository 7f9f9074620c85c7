use sqlx::Error as SqlxError;
use thiserror::Error;

pub type PostgresResult<T> = Result<T, PostgresDaoError>;

#[derive(Debug, Error)]
pub enum PostgresDaoError {
    #[error("failed to connect to PostgreSQL")]
    Connect {
        #[source]
        source: SqlxError,
    },
    #[error("PostgreSQL health check failed")]
    HealthPing {
        #[source]
        source: SqlxError,
    },
    #[error("failed to ensure table `{table}` exists")]
    EnsureSchema {
        table: &'static str,
        #[source]
        source: SqlxError,
    },
    #[error("failed to list matches")]
    ListMatches {
        #[source]
        source: SqlxError,
    },
    #[error("failed to load match `{id}`")]
    LoadMatch {
        id: i32,
        #[source]
        source: SqlxError,
    },
    #[error("failed to clear existing matches")]
    ClearMatches {
        #[source]
        source: SqlxError,
    },
    #[error("failed to insert match")]
    InsertMatch {
        #[source]
        source: SqlxError,
    },
    #[error("insert failed: no row returned")]
    InsertReturnedNothing,
    #[error("failed to update match `{id}`")]
    UpdateMatch {
        id: i32,
        #[source]
        source: SqlxError,
    },
    #[error("failed to delete match `{id}`")]
    DeleteMatch {
        id: i32,
        #[source]
        source: SqlxError,
    },
}
