//! Process-local backend used for `memory://` runs and tests.

use std::sync::{
    Arc,
    atomic::{AtomicI32, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{
    match_store::MatchStore,
    models::{MatchEntity, MatchId, MatchPatchEntity, NewMatchEntity},
    storage::StorageResult,
};

/// In-memory match table. Cloning shares the same rows.
#[derive(Clone, Default)]
pub struct MemoryMatchStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rows: DashMap<MatchId, MatchEntity>,
    next_id: AtomicI32,
}

impl MemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self) -> Vec<MatchEntity> {
        let mut rows: Vec<MatchEntity> = self
            .inner
            .rows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);
        rows
    }

    fn replace_all(&self, new: NewMatchEntity) -> MatchEntity {
        self.inner.rows.clear();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let entity = new.into_entity(id);
        self.inner.rows.insert(id, entity.clone());
        entity
    }

    fn update(&self, id: MatchId, patch: MatchPatchEntity) -> Option<MatchEntity> {
        let mut row = self.inner.rows.get_mut(&id)?;
        patch.apply_to(row.value_mut());
        Some(row.value().clone())
    }
}

impl MatchStore for MemoryMatchStore {
    fn list(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list()) })
    }

    fn find(&self, id: MatchId) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.rows.get(&id).map(|row| row.value().clone())) })
    }

    fn replace_all(&self, new: NewMatchEntity) -> BoxFuture<'static, StorageResult<MatchEntity>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.replace_all(new)) })
    }

    fn update(
        &self,
        id: MatchId,
        patch: MatchPatchEntity,
    ) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.update(id, patch)) })
    }

    fn delete(&self, id: MatchId) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.rows.remove(&id);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
