use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::postgres::unique_violation,
    error::{AppError, AppResult},
    models::Review,
};

/// Game reviews and the ratings stored next to them
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewsStore: Send + Sync {
    async fn get_review(&self, review_id: Uuid) -> AppResult<Option<Review>>;

    /// The review a user wrote for a game, if any
    async fn find_user_review(&self, user_id: Uuid, game_id: Uuid) -> AppResult<Option<Review>>;

    /// Fails with `AppError::Conflict` when the user already reviewed the game
    async fn insert_review(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        review_text: &str,
    ) -> AppResult<Review>;

    /// Inserts or replaces the user's rating of a game
    async fn upsert_rating(&self, user_id: Uuid, game_id: Uuid, rating: i32) -> AppResult<()>;

    async fn delete_rating(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool>;

    async fn delete_review(&self, review_id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgReviewsStore {
    pool: PgPool,
}

impl PgReviewsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const REVIEW_COLUMNS: &str = "id, user_id, game_id, review_text, created_at, updated_at";

#[async_trait::async_trait]
impl ReviewsStore for PgReviewsStore {
    async fn get_review(&self, review_id: Uuid) -> AppResult<Option<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn find_user_review(&self, user_id: Uuid, game_id: Uuid) -> AppResult<Option<Review>> {
        let sql =
            format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE user_id = $1 AND game_id = $2");
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(user_id)
            .bind(game_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    async fn insert_review(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        review_text: &str,
    ) -> AppResult<Review> {
        let sql = format!(
            "INSERT INTO reviews (user_id, game_id, review_text) \
             VALUES ($1, $2, $3) \
             RETURNING {REVIEW_COLUMNS}"
        );

        sqlx::query_as::<_, Review>(&sql)
            .bind(user_id)
            .bind(game_id)
            .bind(review_text)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => AppError::Conflict("Game has already been reviewed".to_string()),
                None => AppError::Database(e),
            })
    }

    async fn upsert_rating(&self, user_id: Uuid, game_id: Uuid, rating: i32) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO ratings (user_id, game_id, rating_value) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, game_id) DO UPDATE SET rating_value = EXCLUDED.rating_value",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(rating)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_rating(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ratings WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_review(&self, review_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
