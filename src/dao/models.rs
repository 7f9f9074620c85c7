use serde::{Deserialize, Serialize};

/// Identifier assigned by the storage backend, monotonically increasing.
pub type MatchId = i32;

/// Persisted match row, as returned by every storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key.
    pub id: MatchId,
    /// Display name of the home side.
    pub home_team: String,
    /// Display name of the away side.
    pub away_team: String,
    /// Ordered home roster, possibly empty.
    pub home_players: Vec<String>,
    /// Ordered away roster, possibly empty.
    pub away_players: Vec<String>,
    /// Home score, never negative.
    pub home_score: i32,
    /// Away score, never negative.
    pub away_score: i32,
    /// Clock as last synced, formatted `MM:SS`.
    pub time: String,
    /// Stadium or event label.
    pub stadium: String,
    /// Week or round label.
    pub week: String,
    /// `true` while the match is live, `false` once final.
    pub is_live: bool,
}

/// Values inserted by a create-as-replace. Defaults are already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchEntity {
    pub home_team: String,
    pub away_team: String,
    pub home_players: Vec<String>,
    pub away_players: Vec<String>,
    pub home_score: i32,
    pub away_score: i32,
    pub time: String,
    pub stadium: String,
    pub week: String,
    pub is_live: bool,
}

impl NewMatchEntity {
    /// Materialise the row a backend stores under `id`.
    pub fn into_entity(self, id: MatchId) -> MatchEntity {
        MatchEntity {
            id,
            home_team: self.home_team,
            away_team: self.away_team,
            home_players: self.home_players,
            away_players: self.away_players,
            home_score: self.home_score.max(0),
            away_score: self.away_score.max(0),
            time: self.time,
            stadium: self.stadium,
            week: self.week,
            is_live: self.is_live,
        }
    }
}

/// Partial update: `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchPatchEntity {
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_players: Option<Vec<String>>,
    pub away_players: Option<Vec<String>>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub time: Option<String>,
    pub stadium: Option<String>,
    pub week: Option<String>,
    pub is_live: Option<bool>,
}

impl MatchPatchEntity {
    /// Apply the supplied fields to an in-memory row. Scores clamp at zero.
    pub fn apply_to(self, entity: &mut MatchEntity) {
        let Self {
            home_team,
            away_team,
            home_players,
            away_players,
            home_score,
            away_score,
            time,
            stadium,
            week,
            is_live,
        } = self;

        if let Some(value) = home_team {
            entity.home_team = value;
        }
        if let Some(value) = away_team {
            entity.away_team = value;
        }
        if let Some(value) = home_players {
            entity.home_players = value;
        }
        if let Some(value) = away_players {
            entity.away_players = value;
        }
        if let Some(value) = home_score {
            entity.home_score = value.max(0);
        }
        if let Some(value) = away_score {
            entity.away_score = value.max(0);
        }
        if let Some(value) = time {
            entity.time = value;
        }
        if let Some(value) = stadium {
            entity.stadium = value;
        }
        if let Some(value) = week {
            entity.week = value;
        }
        if let Some(value) = is_live {
            entity.is_live = value;
        }
    }

    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
