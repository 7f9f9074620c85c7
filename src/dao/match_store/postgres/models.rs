use sqlx::FromRow;

use crate::dao::models::MatchEntity;

/// Row shape of the `matches` table. Nullable columns mirror the schema.
#[derive(Debug, FromRow)]
pub struct MatchRow {
    id: i32,
    home_team: String,
    away_team: String,
    home_players: Option<Vec<String>>,
    away_players: Option<Vec<String>>,
    home_score: i32,
    away_score: i32,
    time: String,
    stadium: String,
    week: String,
    is_live: Option<bool>,
}

impl From<MatchRow> for MatchEntity {
    fn from(row: MatchRow) -> Self {
        Self {
            id: row.id,
            home_team: row.home_team,
            away_team: row.away_team,
            home_players: row.home_players.unwrap_or_default(),
            away_players: row.away_players.unwrap_or_default(),
            home_score: row.home_score,
            away_score: row.away_score,
            time: row.time,
            stadium: row.stadium,
            week: row.week,
            is_live: row.is_live.unwrap_or(true),
        }
    }
}
