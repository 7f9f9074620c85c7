pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;
#[cfg(feature = "postgres-store")]
pub mod postgres;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::dao::models::{MatchEntity, MatchId, MatchPatchEntity, NewMatchEntity};
use crate::dao::storage::{StorageError, StorageResult};

pub use memory::MemoryMatchStore;

/// Abstraction over the persistence layer holding the match rows.
pub trait MatchStore: Send + Sync {
    /// Every stored match, ordered by identifier.
    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;
    fn find(&self, id: MatchId) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Delete every stored match, then insert `new` and return the stored row.
    ///
    /// The two steps are not atomic: a failure in between leaves zero matches.
    fn replace_all(&self, new: NewMatchEntity) -> BoxFuture<'static, StorageResult<MatchEntity>>;
    fn update(
        &self,
        id: MatchId,
        patch: MatchPatchEntity,
    ) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    /// Remove a match. Removing a missing id is not an error.
    fn delete(&self, id: MatchId) -> BoxFuture<'static, StorageResult<()>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// URL schemes understood by the compiled-in backends.
pub fn supported_schemes() -> Vec<&'static str> {
    let mut schemes = vec!["memory"];
    if cfg!(feature = "postgres-store") {
        schemes.extend(["postgres", "postgresql"]);
    }
    if cfg!(feature = "mongo-store") {
        schemes.extend(["mongodb", "mongodb+srv"]);
    }
    schemes
}

/// Fail fast when `url` names a backend this build cannot open.
pub fn check_scheme(url: &str) -> StorageResult<&str> {
    let scheme = url.split_once("://").map(|(scheme, _)| scheme).unwrap_or("");
    if supported_schemes().contains(&scheme) {
        Ok(scheme)
    } else {
        Err(StorageError::UnsupportedScheme {
            scheme: scheme.to_owned(),
        })
    }
}

/// Open the backend matching the scheme of `url`.
pub async fn connect_store(
    url: &str,
    mongo_db: Option<&str>,
) -> StorageResult<Arc<dyn MatchStore>> {
    match check_scheme(url)? {
        #[cfg(feature = "postgres-store")]
        "postgres" | "postgresql" => {
            let store = postgres::PostgresMatchStore::connect(url).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "mongo-store")]
        "mongodb" | "mongodb+srv" => {
            let config = mongodb::MongoConfig::from_uri(url, mongo_db).await?;
            let store = mongodb::MongoMatchStore::connect(config).await?;
            Ok(Arc::new(store))
        }
        _ => {
            let _ = mongo_db;
            Ok(Arc::new(MemoryMatchStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(matches!(
            check_scheme("redis://localhost"),
            Err(StorageError::UnsupportedScheme { scheme }) if scheme == "redis"
        ));
        assert!(check_scheme("localhost:5432").is_err());
    }

    #[tokio::test]
    async fn memory_scheme_opens_an_empty_store() {
        let store = connect_store("memory://", None).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
