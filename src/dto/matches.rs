use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    clock::MatchClock,
    dao::models::{MatchEntity, MatchId, MatchPatchEntity, NewMatchEntity},
    dto::validation::{validate_clock, validate_not_blank},
};

/// Match as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub id: MatchId,
    pub home_team: String,
    pub away_team: String,
    pub home_players: Vec<String>,
    pub away_players: Vec<String>,
    pub home_score: i32,
    pub away_score: i32,
    /// Clock formatted `MM:SS`.
    #[schema(example = "12:00")]
    pub time: String,
    pub stadium: String,
    pub week: String,
    pub is_live: bool,
}

impl From<MatchEntity> for MatchDto {
    fn from(entity: MatchEntity) -> Self {
        Self {
            id: entity.id,
            home_team: entity.home_team,
            away_team: entity.away_team,
            home_players: entity.home_players,
            away_players: entity.away_players,
            home_score: entity.home_score,
            away_score: entity.away_score,
            time: entity.time,
            stadium: entity.stadium,
            week: entity.week,
            is_live: entity.is_live,
        }
    }
}

/// Payload of `POST /api/matches`. Replaces every stored match.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub home_team: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub away_team: String,
    #[serde(default)]
    pub home_players: Vec<String>,
    #[serde(default)]
    pub away_players: Vec<String>,
    /// Negative values are stored as 0.
    #[serde(default)]
    pub home_score: i32,
    /// Negative values are stored as 0.
    #[serde(default)]
    pub away_score: i32,
    #[serde(default = "default_time")]
    #[validate(custom(function = "validate_clock"))]
    #[schema(example = "12:00")]
    pub time: String,
    pub stadium: String,
    pub week: String,
    #[serde(default = "default_is_live")]
    pub is_live: bool,
}

impl CreateMatchRequest {
    /// Fresh match between two teams with every optional field at its default.
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        stadium: impl Into<String>,
        week: impl Into<String>,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_players: Vec::new(),
            away_players: Vec::new(),
            home_score: 0,
            away_score: 0,
            time: default_time(),
            stadium: stadium.into(),
            week: week.into(),
            is_live: default_is_live(),
        }
    }
}

impl From<CreateMatchRequest> for NewMatchEntity {
    fn from(request: CreateMatchRequest) -> Self {
        Self {
            home_team: request.home_team,
            away_team: request.away_team,
            home_players: request.home_players,
            away_players: request.away_players,
            home_score: request.home_score.max(0),
            away_score: request.away_score.max(0),
            time: canonical_time(request.time),
            stadium: request.stadium,
            week: request.week,
            is_live: request.is_live,
        }
    }
}

/// Payload of `PUT /api/matches/{id}`; absent fields are left untouched.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub home_team: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub away_team: Option<String>,
    pub home_players: Option<Vec<String>>,
    pub away_players: Option<Vec<String>>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    #[validate(custom(function = "validate_clock"))]
    pub time: Option<String>,
    pub stadium: Option<String>,
    pub week: Option<String>,
    pub is_live: Option<bool>,
}

impl UpdateMatchRequest {
    /// Time sync written by the timer while it runs.
    pub fn time(clock: MatchClock) -> Self {
        Self {
            time: Some(clock.to_string()),
            ..Self::default()
        }
    }

    /// Time sync that also sets the live flag.
    pub fn time_and_live(clock: MatchClock, is_live: bool) -> Self {
        Self {
            time: Some(clock.to_string()),
            is_live: Some(is_live),
            ..Self::default()
        }
    }
}

impl From<UpdateMatchRequest> for MatchPatchEntity {
    fn from(request: UpdateMatchRequest) -> Self {
        Self {
            home_team: request.home_team,
            away_team: request.away_team,
            home_players: request.home_players,
            away_players: request.away_players,
            home_score: request.home_score.map(|score| score.max(0)),
            away_score: request.away_score.map(|score| score.max(0)),
            time: request.time.map(canonical_time),
            stadium: request.stadium,
            week: request.week,
            is_live: request.is_live,
        }
    }
}

/// Stored clocks are always zero-padded `MM:SS`; `5:7` and ` 05:07 ` both become `05:07`.
fn canonical_time(raw: String) -> String {
    raw.parse::<MatchClock>()
        .map(|clock| clock.to_string())
        .unwrap_or(raw)
}

fn default_time() -> String {
    MatchClock::from_seconds(0).to_string()
}

fn default_is_live() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_applies_defaults() {
        let request: CreateMatchRequest = serde_json::from_value(json!({
            "homeTeam": "Lions",
            "awayTeam": "Tigers",
            "stadium": "Arena",
            "week": "3"
        }))
        .unwrap();

        assert!(request.home_players.is_empty());
        assert_eq!(request.home_score, 0);
        assert_eq!(request.time, "00:00");
        assert!(request.is_live);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_request_clamps_negative_scores() {
        let mut request = CreateMatchRequest::new("A", "B", "Hall", "1");
        request.home_score = -4;
        let entity = NewMatchEntity::from(request);
        assert_eq!(entity.home_score, 0);
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let value = serde_json::to_value(UpdateMatchRequest::time_and_live(
            MatchClock::from_seconds(90),
            false,
        ))
        .unwrap();
        assert_eq!(value, json!({"time": "01:30", "isLive": false}));
    }

    #[test]
    fn clocks_are_stored_zero_padded() {
        let mut request = CreateMatchRequest::new("A", "B", "Hall", "1");
        request.time = " 5:7 ".into();
        assert_eq!(NewMatchEntity::from(request).time, "05:07");

        let patch = MatchPatchEntity::from(UpdateMatchRequest {
            time: Some("000:030".into()),
            ..UpdateMatchRequest::default()
        });
        assert_eq!(patch.time.as_deref(), Some("00:30"));
    }

    #[test]
    fn update_request_rejects_bad_clock() {
        let request = UpdateMatchRequest {
            time: Some("1:75".into()),
            ..UpdateMatchRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn dto_uses_camel_case() {
        let dto = MatchDto::from(NewMatchEntity::from(CreateMatchRequest::new("A", "B", "C", "D")).into_entity(7));
        let value = serde_json::to_value(dto).unwrap();
        assert_eq!(value["homeTeam"], "A");
        assert_eq!(value["isLive"], true);
        assert_eq!(value["id"], 7);
    }
}
