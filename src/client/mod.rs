//! Client side of the match API: the [`MatchApi`] seam, its HTTP implementation
//! and the polling client used by the broadcast and admin views.

#[cfg(feature = "console")]
pub mod http;
pub mod poller;

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::{
    dao::models::MatchId,
    dto::matches::{CreateMatchRequest, MatchDto, UpdateMatchRequest},
};

#[cfg(feature = "console")]
pub use http::HttpMatchApi;
pub use poller::MatchPoller;

/// Convenient result alias returning [`ClientError`] failures.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures seen by API consumers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status and an error body.
    #[error("{message} (HTTP {status})")]
    Api {
        status: u16,
        message: String,
        field: Option<String>,
    },
    /// The request never produced a response.
    #[error("request to `{path}` failed")]
    Transport {
        path: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A success response carried a body that could not be decoded.
    #[error("failed to decode response from `{path}`")]
    Decode {
        path: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl ClientError {
    /// `true` for a 404 answer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Operations the consoles perform against the scoreboard API.
pub trait MatchApi: Send + Sync {
    fn list(&self) -> BoxFuture<'static, ClientResult<Vec<MatchDto>>>;
    fn get(&self, id: MatchId) -> BoxFuture<'static, ClientResult<MatchDto>>;
    /// Create a match; the server removes every other match.
    fn create(&self, request: CreateMatchRequest) -> BoxFuture<'static, ClientResult<MatchDto>>;
    fn update(
        &self,
        id: MatchId,
        request: UpdateMatchRequest,
    ) -> BoxFuture<'static, ClientResult<MatchDto>>;
    fn delete(&self, id: MatchId) -> BoxFuture<'static, ClientResult<()>>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory [`MatchApi`] recording every write, for driver and poller tests.

    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use super::*;
    use crate::dao::models::MatchPatchEntity;

    #[derive(Clone, Default)]
    pub struct FakeApi {
        pub matches: Arc<Mutex<Vec<MatchDto>>>,
        pub writes: Arc<Mutex<Vec<(MatchId, UpdateMatchRequest)>>>,
        pub list_calls: Arc<AtomicUsize>,
        pub failing: Arc<AtomicBool>,
    }

    impl FakeApi {
        pub fn with_match(dto: MatchDto) -> Self {
            let api = Self::default();
            api.matches.lock().unwrap().push(dto);
            api
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn stored(&self, id: MatchId) -> Option<MatchDto> {
            self.matches
                .lock()
                .unwrap()
                .iter()
                .find(|dto| dto.id == id)
                .cloned()
        }

        fn fail(&self) -> ClientResult<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ClientError::Transport {
                    path: "/api/matches".into(),
                    source: Box::new(std::io::Error::other("connection refused")),
                });
            }
            Ok(())
        }
    }

    fn to_entity(dto: &MatchDto) -> crate::dao::models::MatchEntity {
        crate::dao::models::MatchEntity {
            id: dto.id,
            home_team: dto.home_team.clone(),
            away_team: dto.away_team.clone(),
            home_players: dto.home_players.clone(),
            away_players: dto.away_players.clone(),
            home_score: dto.home_score,
            away_score: dto.away_score,
            time: dto.time.clone(),
            stadium: dto.stadium.clone(),
            week: dto.week.clone(),
            is_live: dto.is_live,
        }
    }

    impl MatchApi for FakeApi {
        fn list(&self) -> BoxFuture<'static, ClientResult<Vec<MatchDto>>> {
            let api = self.clone();
            Box::pin(async move {
                api.list_calls.fetch_add(1, Ordering::SeqCst);
                api.fail()?;
                Ok(api.matches.lock().unwrap().clone())
            })
        }

        fn get(&self, id: MatchId) -> BoxFuture<'static, ClientResult<MatchDto>> {
            let api = self.clone();
            Box::pin(async move {
                api.fail()?;
                api.stored(id).ok_or(ClientError::Api {
                    status: 404,
                    message: "Match not found".into(),
                    field: None,
                })
            })
        }

        fn create(
            &self,
            request: CreateMatchRequest,
        ) -> BoxFuture<'static, ClientResult<MatchDto>> {
            let api = self.clone();
            Box::pin(async move {
                api.fail()?;
                let mut matches = api.matches.lock().unwrap();
                let id = matches.iter().map(|dto| dto.id).max().unwrap_or(0) + 1;
                let created = MatchDto::from(
                    crate::dao::models::NewMatchEntity::from(request).into_entity(id),
                );
                *matches = vec![created.clone()];
                Ok(created)
            })
        }

        fn update(
            &self,
            id: MatchId,
            request: UpdateMatchRequest,
        ) -> BoxFuture<'static, ClientResult<MatchDto>> {
            let api = self.clone();
            Box::pin(async move {
                api.fail()?;
                api.writes.lock().unwrap().push((id, request.clone()));
                let mut matches = api.matches.lock().unwrap();
                let dto = matches
                    .iter_mut()
                    .find(|dto| dto.id == id)
                    .ok_or(ClientError::Api {
                        status: 404,
                        message: "Match not found".into(),
                        field: None,
                    })?;
                let mut entity = to_entity(dto);
                MatchPatchEntity::from(request).apply_to(&mut entity);
                *dto = MatchDto::from(entity);
                Ok(dto.clone())
            })
        }

        fn delete(&self, id: MatchId) -> BoxFuture<'static, ClientResult<()>> {
            let api = self.clone();
            Box::pin(async move {
                api.fail()?;
                api.matches.lock().unwrap().retain(|dto| dto.id != id);
                Ok(())
            })
        }
    }
}
