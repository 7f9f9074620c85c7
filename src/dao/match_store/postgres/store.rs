use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::{info, warn};

use super::{
    error::{PostgresDaoError, PostgresResult},
    models::MatchRow,
};
use crate::dao::{
    match_store::MatchStore,
    models::{MatchEntity, MatchId, MatchPatchEntity, NewMatchEntity},
    storage::StorageResult,
};

const MATCH_TABLE_NAME: &str = "matches";
const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS matches (
    id SERIAL PRIMARY KEY,
    home_team TEXT NOT NULL,
    away_team TEXT NOT NULL,
    home_players TEXT[],
    away_players TEXT[],
    home_score INTEGER NOT NULL DEFAULT 0,
    away_score INTEGER NOT NULL DEFAULT 0,
    time TEXT NOT NULL DEFAULT '00:00',
    stadium TEXT NOT NULL,
    week TEXT NOT NULL,
    is_live BOOLEAN DEFAULT TRUE
)";

const MATCH_COLUMNS: &str = "id, home_team, away_team, home_players, away_players, \
     home_score, away_score, time, stadium, week, is_live";

/// `matches` table on PostgreSQL. The pool reconnects lazily on its own.
#[derive(Clone)]
pub struct PostgresMatchStore {
    pool: PgPool,
}

impl PostgresMatchStore {
    /// Open a pool against `url` and make sure the table exists.
    pub async fn connect(url: &str) -> PostgresResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await
            .map_err(|source| PostgresDaoError::Connect { source })?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!(table = MATCH_TABLE_NAME, "PostgreSQL match store ready");
        Ok(store)
    }

    async fn ensure_schema(&self) -> PostgresResult<()> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|source| PostgresDaoError::EnsureSchema {
                table: MATCH_TABLE_NAME,
                source,
            })?;
        Ok(())
    }

    async fn ping(&self) -> PostgresResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|source| PostgresDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn list(&self) -> PostgresResult<Vec<MatchEntity>> {
        let rows: Vec<MatchRow> =
            sqlx::query_as(&format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(|source| PostgresDaoError::ListMatches { source })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: MatchId) -> PostgresResult<Option<MatchEntity>> {
        let row: Option<MatchRow> =
            sqlx::query_as(&format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|source| PostgresDaoError::LoadMatch { id, source })?;

        Ok(row.map(Into::into))
    }

    async fn replace_all(&self, new: NewMatchEntity) -> PostgresResult<MatchEntity> {
        let cleared = sqlx::query("DELETE FROM matches")
            .execute(&self.pool)
            .await
            .map_err(|source| PostgresDaoError::ClearMatches { source })?;

        let row: Option<MatchRow> = sqlx::query_as(&format!(
            "INSERT INTO matches (home_team, away_team, home_players, away_players, \
             home_score, away_score, time, stadium, week, is_live) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {MATCH_COLUMNS}"
        ))
        .bind(new.home_team)
        .bind(new.away_team)
        .bind(new.home_players)
        .bind(new.away_players)
        .bind(new.home_score.max(0))
        .bind(new.away_score.max(0))
        .bind(new.time)
        .bind(new.stadium)
        .bind(new.week)
        .bind(new.is_live)
        .fetch_optional(&self.pool)
        .await
        .map_err(|source| {
            warn!(
                cleared = cleared.rows_affected(),
                "insert failed after clearing matches; table is now empty"
            );
            PostgresDaoError::InsertMatch { source }
        })?;

        row.map(MatchEntity::from)
            .ok_or(PostgresDaoError::InsertReturnedNothing)
    }

    async fn update(
        &self,
        id: MatchId,
        patch: MatchPatchEntity,
    ) -> PostgresResult<Option<MatchEntity>> {
        let row: Option<MatchRow> = sqlx::query_as(&format!(
            "UPDATE matches SET \
             home_team = COALESCE($2, home_team), \
             away_team = COALESCE($3, away_team), \
             home_players = COALESCE($4::text[], home_players), \
             away_players = COALESCE($5::text[], away_players), \
             home_score = COALESCE(GREATEST($6::integer, 0), home_score), \
             away_score = COALESCE(GREATEST($7::integer, 0), away_score), \
             time = COALESCE($8, time), \
             stadium = COALESCE($9, stadium), \
             week = COALESCE($10, week), \
             is_live = COALESCE($11, is_live) \
             WHERE id = $1 \
             RETURNING {MATCH_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.home_team)
        .bind(patch.away_team)
        .bind(patch.home_players)
        .bind(patch.away_players)
        .bind(patch.home_score)
        .bind(patch.away_score)
        .bind(patch.time)
        .bind(patch.stadium)
        .bind(patch.week)
        .bind(patch.is_live)
        .fetch_optional(&self.pool)
        .await
        .map_err(|source| PostgresDaoError::UpdateMatch { id, source })?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: MatchId) -> PostgresResult<()> {
        sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|source| PostgresDaoError::DeleteMatch { id, source })?;
        Ok(())
    }
}

impl MatchStore for PostgresMatchStore {
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
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        // The pool replaces broken connections itself; a successful ping is a reconnect.
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
