//! Fixed-interval polling of the match API.
//!
//! A failed fetch is logged and leaves the last published value in place; the
//! next tick simply tries again. Dropping the [`MatchPoller`] stops the task.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, warn};

use super::{ClientResult, MatchApi};
use crate::{dao::models::MatchId, dto::matches::MatchDto};

/// What a poller fetches on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollTarget {
    /// The whole match list; the first entry is the match on screen.
    List,
    /// A single match by identifier.
    Match(MatchId),
}

/// Background task publishing the latest fetched matches.
pub struct MatchPoller {
    receiver: watch::Receiver<Option<Vec<MatchDto>>>,
    task: JoinHandle<()>,
}

impl MatchPoller {
    /// Fetch immediately, then once every `every`.
    ///
    /// The published value stays `None` until the first successful fetch. A
    /// single-match target publishes an empty list once the match is gone.
    pub fn spawn(api: Arc<dyn MatchApi>, target: PollTarget, every: Duration) -> Self {
        let (sender, receiver) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match fetch(api.as_ref(), target).await {
                    Ok(matches) => {
                        sender.send_if_modified(|current| {
                            if current.as_ref() == Some(&matches) {
                                return false;
                            }
                            *current = Some(matches);
                            true
                        });
                    }
                    Err(err) => warn!(?target, error = %err, "poll failed; keeping last state"),
                }

                if sender.is_closed() {
                    debug!(?target, "no poll subscribers left; stopping");
                    break;
                }
            }
        });

        Self { receiver, task }
    }

    /// Watch the published state; `changed()` fires on every new value.
    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<MatchDto>>> {
        self.receiver.clone()
    }

    /// Last successfully fetched state.
    pub fn latest(&self) -> Option<Vec<MatchDto>> {
        self.receiver.borrow().clone()
    }

    /// Match on screen according to the last successful fetch.
    pub fn current(&self) -> Option<MatchDto> {
        self.receiver
            .borrow()
            .as_ref()
            .and_then(|matches| matches.first().cloned())
    }
}

impl Drop for MatchPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn fetch(api: &dyn MatchApi, target: PollTarget) -> ClientResult<Vec<MatchDto>> {
    match target {
        PollTarget::List => api.list().await,
        PollTarget::Match(id) => match api.get(id).await {
            Ok(dto) => Ok(vec![dto]),
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            Err(err) => Err(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{
        client::testing::FakeApi,
        dao::models::NewMatchEntity,
        dto::matches::CreateMatchRequest,
    };

    const EVERY: Duration = Duration::from_secs(2);

    fn sample(id: MatchId) -> MatchDto {
        MatchDto::from(
            NewMatchEntity::from(CreateMatchRequest::new("Lions", "Tigers", "Arena", "1"))
                .into_entity(id),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_every_interval() {
        let api = FakeApi::with_match(sample(1));
        let poller = MatchPoller::spawn(Arc::new(api.clone()), PollTarget::List, EVERY);

        let mut updates = poller.subscribe();
        updates.changed().await.unwrap();
        assert_eq!(poller.current().map(|dto| dto.id), Some(1));
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(4_100)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_last_state() {
        let api = FakeApi::with_match(sample(1));
        let poller = MatchPoller::spawn(Arc::new(api.clone()), PollTarget::List, EVERY);
        poller.subscribe().changed().await.unwrap();

        api.set_failing(true);
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(poller.latest().map(|list| list.len()), Some(1));

        api.set_failing(false);
        api.matches.lock().unwrap().clear();
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(poller.latest(), Some(Vec::new()));
        assert_eq!(poller.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn single_match_target_reports_deletion_as_empty() {
        let api = FakeApi::with_match(sample(5));
        let poller = MatchPoller::spawn(Arc::new(api.clone()), PollTarget::Match(5), EVERY);
        poller.subscribe().changed().await.unwrap();
        assert_eq!(poller.current().map(|dto| dto.id), Some(5));

        api.matches.lock().unwrap().clear();
        tokio::time::sleep(Duration::from_millis(2_100)).await;
        assert_eq!(poller.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_poller_stops_fetching() {
        let api = FakeApi::with_match(sample(1));
        let poller = MatchPoller::spawn(Arc::new(api.clone()), PollTarget::List, EVERY);
        poller.subscribe().changed().await.unwrap();
        drop(poller);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    }
}
