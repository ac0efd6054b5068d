use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::postgres::unique_violation,
    error::{AppError, AppResult},
    models::{BoardGame, FavoriteGame, FavoriteSort, FavoritesQuery, Page},
};

/// Per-user favorite games
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn list_favorites(
        &self,
        user_id: Uuid,
        query: &FavoritesQuery,
    ) -> AppResult<Page<FavoriteGame>>;

    async fn is_favorite(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool>;

    /// Fails with `AppError::Conflict` when the game is already a favorite
    async fn add_favorite(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<FavoriteGame>;

    /// Returns whether a row was removed
    async fn remove_favorite(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgFavoritesStore {
    pool: PgPool,
}

impl PgFavoritesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct FavoriteRecord {
    favorite_id: Uuid,
    user_id: Uuid,
    notes: Option<String>,
    added_at: DateTime<Utc>,
    #[sqlx(flatten)]
    game: BoardGame,
}

impl FavoriteRecord {
    fn to_domain(self) -> FavoriteGame {
        FavoriteGame {
            id: self.favorite_id,
            user_id: self.user_id,
            game_id: self.game.id,
            notes: self.notes,
            added_at: self.added_at,
            game: self.game,
        }
    }
}

const FAVORITE_GAME_COLUMNS: &str = "g.id, g.title, g.description, g.min_players, g.max_players, \
     g.duration, g.complexity, g.types, g.is_archived, g.created_by, g.created_at, g.updated_at";

#[async_trait::async_trait]
impl FavoritesStore for PgFavoritesStore {
    async fn list_favorites(
        &self,
        user_id: Uuid,
        query: &FavoritesQuery,
    ) -> AppResult<Page<FavoriteGame>> {
        let order = match query.sort {
            FavoriteSort::AddedAt => "f.added_at DESC",
            FavoriteSort::Title => "g.title ASC",
        };
        let sql = format!(
            "SELECT f.id AS favorite_id, f.user_id, f.notes, f.added_at, {FAVORITE_GAME_COLUMNS} \
             FROM favorite_games f \
             JOIN board_games g ON g.id = f.game_id \
             WHERE f.user_id = $1 \
             ORDER BY {order}, f.id \
             LIMIT $2 OFFSET $3"
        );

        let records = sqlx::query_as::<_, FavoriteRecord>(&sql)
            .bind(user_id)
            .bind(i64::from(query.limit))
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM favorite_games WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(Page {
            items: records.into_iter().map(FavoriteRecord::to_domain).collect(),
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn is_favorite(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM favorite_games WHERE user_id = $1 AND game_id = $2)",
        )
        .bind(user_id)
        .bind(game_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn add_favorite(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<FavoriteGame> {
        let sql = format!(
            "WITH inserted AS ( \
                 INSERT INTO favorite_games (user_id, game_id, notes) \
                 VALUES ($1, $2, $3) \
                 RETURNING id, user_id, game_id, notes, added_at \
             ) \
             SELECT f.id AS favorite_id, f.user_id, f.notes, f.added_at, {FAVORITE_GAME_COLUMNS} \
             FROM inserted f \
             JOIN board_games g ON g.id = f.game_id"
        );

        let record = sqlx::query_as::<_, FavoriteRecord>(&sql)
            .bind(user_id)
            .bind(game_id)
            .bind(notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => AppError::Conflict("Game is already a favorite".to_string()),
                None => AppError::Database(e),
            })?;

        Ok(record.to_domain())
    }

    async fn remove_favorite(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorite_games WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
