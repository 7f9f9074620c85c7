use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Collection, Database, bson::doc, options::ReturnDocument};
use tokio::sync::RwLock;
use tracing::warn;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{CounterDocument, MongoMatchDocument, doc_id, patch_to_set},
};
use crate::dao::{
    match_store::MatchStore,
    models::{MatchEntity, MatchId, MatchPatchEntity, NewMatchEntity},
    storage::StorageResult,
};

const MATCH_COLLECTION_NAME: &str = "matches";
const COUNTER_COLLECTION_NAME: &str = "counters";
const MATCH_SEQUENCE: &str = "matches";

#[derive(Clone)]
pub struct MongoMatchStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (_client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.database = database;
        Ok(())
    }
}

impl MongoMatchStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoMatchDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoMatchDocument>(MATCH_COLLECTION_NAME)
    }

    async fn counter_collection(&self) -> Collection<CounterDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<CounterDocument>(COUNTER_COLLECTION_NAME)
    }

    /// Atomically bump the match sequence and return the new value.
    async fn next_id(&self) -> MongoResult<MatchId> {
        let counters = self.counter_collection().await;
        let counter = counters
            .find_one_and_update(doc! {"_id": MATCH_SEQUENCE}, doc! {"$inc": {"seq": 1}})
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::NextId { source })?;

        counter
            .map(|counter| counter.seq)
            .ok_or(MongoDaoError::InsertReturnedNothing)
    }

    async fn list(&self) -> MongoResult<Vec<MatchEntity>> {
        let collection = self.collection().await;

        let documents: Vec<MongoMatchDocument> = collection
            .find(doc! {})
            .sort(doc! {"_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListMatches { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: MatchId) -> MongoResult<Option<MatchEntity>> {
        let collection = self.collection().await;

        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadMatch { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn replace_all(&self, new: NewMatchEntity) -> MongoResult<MatchEntity> {
        let collection = self.collection().await;
        collection
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::ClearMatches { source })?;

        let id = self.next_id().await.inspect_err(|err| {
            warn!(error = %err, "id allocation failed after clearing matches; collection is now empty");
        })?;
        let document: MongoMatchDocument = new.into_entity(id).into();
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertMatch { id, source })?;

        // Read back what was stored so callers see the persisted row.
        self.find(id)
            .await?
            .ok_or(MongoDaoError::InsertReturnedNothing)
    }

    async fn update(
        &self,
        id: MatchId,
        patch: MatchPatchEntity,
    ) -> MongoResult<Option<MatchEntity>> {
        let Some(update) = patch_to_set(patch) else {
            return self.find(id).await;
        };

        let collection = self.collection().await;
        let document = collection
            .find_one_and_update(doc_id(id), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::UpdateMatch { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn delete(&self, id: MatchId) -> MongoResult<()> {
        let collection = self.collection().await;
        collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteMatch { id, source })?;
        Ok(())
    }
}

impl MatchStore for MongoMatchStore {
    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list().await.map_err(Into::into) })
    }

    fn find(&self, id: MatchId) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find(id).await.map_err(Into::into) })
    }

    fn replace_all(&self, new: NewMatchEntity) -> BoxFuture<'static, StorageResult<MatchEntity>> {
        let store = self.clone();
        Box::pin(async move { store.replace_all(new).await.map_err(Into::into) })
    }

    fn update(
        &self,
        id: MatchId,
        patch: MatchPatchEntity,
    ) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.update(id, patch).await.map_err(Into::into) })
    }

    fn delete(&self, id: MatchId) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
