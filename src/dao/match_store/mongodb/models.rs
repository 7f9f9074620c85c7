use mongodb::bson::{Bson, Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::{MatchEntity, MatchPatchEntity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: i32,
    home_team: String,
    away_team: String,
    #[serde(default)]
    home_players: Vec<String>,
    #[serde(default)]
    away_players: Vec<String>,
    home_score: i32,
    away_score: i32,
    time: String,
    stadium: String,
    week: String,
    #[serde(default = "default_live")]
    is_live: bool,
}

fn default_live() -> bool {
    true
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id,
            home_team: value.home_team,
            away_team: value.away_team,
            home_players: value.home_players,
            away_players: value.away_players,
            home_score: value.home_score,
            away_score: value.away_score,
            time: value.time,
            stadium: value.stadium,
            week: value.week,
            is_live: value.is_live,
        }
    }
}

impl From<MongoMatchDocument> for MatchEntity {
    fn from(value: MongoMatchDocument) -> Self {
        Self {
            id: value.id,
            home_team: value.home_team,
            away_team: value.away_team,
            home_players: value.home_players,
            away_players: value.away_players,
            home_score: value.home_score,
            away_score: value.away_score,
            time: value.time,
            stadium: value.stadium,
            week: value.week,
            is_live: value.is_live,
        }
    }
}

/// Sequence document used to hand out monotonically increasing match ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterDocument {
    #[serde(rename = "_id")]
    pub name: String,
    pub seq: i32,
}

pub fn doc_id(id: i32) -> Document {
    doc! {"_id": id}
}

/// Translate a patch into a `$set` document. Returns `None` for an empty patch.
pub fn patch_to_set(patch: MatchPatchEntity) -> Option<Document> {
    if patch.is_empty() {
        return None;
    }

    let mut set = Document::new();

    if let Some(value) = patch.home_team {
        set.insert("home_team", value);
    }
    if let Some(value) = patch.away_team {
        set.insert("away_team", value);
    }
    if let Some(value) = patch.home_players {
        set.insert("home_players", strings(value));
    }
    if let Some(value) = patch.away_players {
        set.insert("away_players", strings(value));
    }
    if let Some(value) = patch.home_score {
        set.insert("home_score", value.max(0));
    }
    if let Some(value) = patch.away_score {
        set.insert("away_score", value.max(0));
    }
    if let Some(value) = patch.time {
        set.insert("time", value);
    }
    if let Some(value) = patch.stadium {
        set.insert("stadium", value);
    }
    if let Some(value) = patch.week {
        set.insert("week", value);
    }
    if let Some(value) = patch.is_live {
        set.insert("is_live", value);
    }

    Some(doc! {"$set": set})
}

fn strings(values: Vec<String>) -> Bson {
    Bson::Array(values.into_iter().map(Bson::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_produces_no_update() {
        assert!(patch_to_set(MatchPatchEntity::default()).is_none());
    }

    #[test]
    fn patch_sets_only_supplied_fields_and_clamps_scores() {
        let update = patch_to_set(MatchPatchEntity {
            home_score: Some(-3),
            time: Some("04:10".into()),
            ..Default::default()
        })
        .unwrap();

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_i32("home_score").unwrap(), 0);
        assert_eq!(set.get_str("time").unwrap(), "04:10");
    }
}
