mod sse;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{dao::match_store::MatchStore, error::ServiceError};

pub use self::sse::SseHub;

pub type SharedState = Arc<AppState>;

const EVENTS_CAPACITY: usize = 16;

/// Availability of the storage backend as seen by request handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStatus {
    /// No `DATABASE_URL` was provided; nothing will ever connect.
    Unconfigured,
    /// A database is configured but no healthy connection is installed.
    Degraded,
    /// Requests can be served.
    Ready,
}

/// Central application state holding the match store handle and the SSE hub.
pub struct AppState {
    store: RwLock<Option<Arc<dyn MatchStore>>>,
    status: watch::Sender<StorageStatus>,
    events: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new() -> SharedState {
        Self::with_status(StorageStatus::Degraded)
    }

    /// State for a server started without `DATABASE_URL`.
    pub fn unconfigured() -> SharedState {
        Self::with_status(StorageStatus::Unconfigured)
    }

    /// State with `store` already installed, as used by tests and `memory://`.
    pub fn with_store(store: Arc<dyn MatchStore>) -> SharedState {
        let (status, _rx) = watch::channel(StorageStatus::Ready);
        Arc::new(Self {
            store: RwLock::new(Some(store)),
            status,
            events: SseHub::new(EVENTS_CAPACITY),
        })
    }

    fn with_status(initial: StorageStatus) -> SharedState {
        let (status, _rx) = watch::channel(initial);
        Arc::new(Self {
            store: RwLock::new(None),
            status,
            events: SseHub::new(EVENTS_CAPACITY),
        })
    }

    /// Install a new match store implementation and leave degraded mode.
    pub async fn set_match_store(&self, store: Arc<dyn MatchStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Obtain the installed store, or the reason requests cannot be served.
    pub async fn require_match_store(&self) -> Result<Arc<dyn MatchStore>, ServiceError> {
        match self.status() {
            StorageStatus::Unconfigured => return Err(ServiceError::NotConfigured),
            StorageStatus::Degraded => return Err(ServiceError::Degraded),
            StorageStatus::Ready => {}
        }

        let guard = self.store.read().await;
        guard.as_ref().cloned().ok_or(ServiceError::Degraded)
    }

    /// Current storage status.
    pub fn status(&self) -> StorageStatus {
        *self.status.borrow()
    }

    /// Current degraded flag. An unconfigured server counts as degraded.
    pub fn is_degraded(&self) -> bool {
        self.status() != StorageStatus::Ready
    }

    /// Flip between `Degraded` and `Ready`, notifying watchers only on change.
    ///
    /// An unconfigured state is terminal and left untouched.
    pub fn update_degraded(&self, degraded: bool) {
        let next = if degraded {
            StorageStatus::Degraded
        } else {
            StorageStatus::Ready
        };
        self.status.send_if_modified(|current| {
            if *current == StorageStatus::Unconfigured || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    /// Subscribe to storage status updates.
    pub fn status_watcher(&self) -> watch::Receiver<StorageStatus> {
        self.status.subscribe()
    }

    /// Broadcast hub used for the match events stream.
    pub fn events(&self) -> &SseHub {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::match_store::MemoryMatchStore;

    #[tokio::test]
    async fn installing_a_store_leaves_degraded_mode() {
        let state = AppState::new();
        assert!(matches!(
            state.require_match_store().await,
            Err(ServiceError::Degraded)
        ));

        let mut watcher = state.status_watcher();
        state.set_match_store(Arc::new(MemoryMatchStore::new())).await;

        assert!(watcher.has_changed().unwrap());
        assert_eq!(*watcher.borrow_and_update(), StorageStatus::Ready);
        assert!(state.require_match_store().await.is_ok());
    }

    #[tokio::test]
    async fn unconfigured_state_never_becomes_ready() {
        let state = AppState::unconfigured();
        state.update_degraded(false);
        assert_eq!(state.status(), StorageStatus::Unconfigured);
        assert!(matches!(
            state.require_match_store().await,
            Err(ServiceError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn degraded_flag_hides_installed_store() {
        let state = AppState::with_store(Arc::new(MemoryMatchStore::new()));
        state.update_degraded(true);
        assert!(state.is_degraded());
        assert!(state.require_match_store().await.is_err());
    }
}
