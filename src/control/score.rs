//! Score buttons: every click is one immediate absolute write.

use std::fmt;

use crate::{
    client::{ClientResult, MatchApi},
    dto::matches::{MatchDto, UpdateMatchRequest},
};

/// Which side a score adjustment applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

/// `max(0, current + delta)`, saturating instead of overflowing.
pub fn adjusted_score(current: i32, delta: i32) -> i32 {
    current.saturating_add(delta).max(0)
}

/// Absolute score update for one side of `current`.
pub fn score_update(current: &MatchDto, side: Side, delta: i32) -> UpdateMatchRequest {
    match side {
        Side::Home => UpdateMatchRequest {
            home_score: Some(adjusted_score(current.home_score, delta)),
            ..UpdateMatchRequest::default()
        },
        Side::Away => UpdateMatchRequest {
            away_score: Some(adjusted_score(current.away_score, delta)),
            ..UpdateMatchRequest::default()
        },
    }
}

/// Apply `delta` to one side and persist the new absolute value.
pub async fn adjust_score(
    api: &dyn MatchApi,
    current: &MatchDto,
    side: Side,
    delta: i32,
) -> ClientResult<MatchDto> {
    api.update(current.id, score_update(current, side, delta)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::testing::FakeApi, dao::models::NewMatchEntity, dto::matches::CreateMatchRequest,
    };

    fn sample() -> MatchDto {
        let mut request = CreateMatchRequest::new("Lions", "Tigers", "Arena", "1");
        request.home_score = 2;
        MatchDto::from(NewMatchEntity::from(request).into_entity(1))
    }

    #[test]
    fn scores_never_go_negative() {
        assert_eq!(adjusted_score(0, -1), 0);
        assert_eq!(adjusted_score(3, -5), 0);
        assert_eq!(adjusted_score(3, 2), 5);
        assert_eq!(adjusted_score(i32::MAX, 1), i32::MAX);
    }

    #[test]
    fn update_touches_only_one_side() {
        let update = score_update(&sample(), Side::Away, 3);
        assert_eq!(update.away_score, Some(3));
        assert_eq!(update.home_score, None);
        assert_eq!(update.time, None);
    }

    #[tokio::test]
    async fn adjust_score_writes_absolute_value() {
        let api = FakeApi::with_match(sample());
        let updated = adjust_score(&api, &sample(), Side::Home, -3).await.unwrap();
        assert_eq!(updated.home_score, 0);
        assert_eq!(
            api.writes.lock().unwrap().last().map(|(_, req)| req.home_score),
            Some(Some(0))
        );
    }
}
