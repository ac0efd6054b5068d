use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::UserPreferences};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PreferencesStore: Send + Sync {
    /// `None` until the user saves preferences for the first time
    async fn get_preferences(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>>;

    async fn save_preferences(
        &self,
        user_id: Uuid,
        preferred_types: &[Uuid],
    ) -> AppResult<UserPreferences>;
}

#[derive(Clone)]
pub struct PgPreferencesStore {
    pool: PgPool,
}

impl PgPreferencesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PreferencesStore for PgPreferencesStore {
    async fn get_preferences(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>> {
        let preferences = sqlx::query_as::<_, UserPreferences>(
            "SELECT preferred_types FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(preferences)
    }

    async fn save_preferences(
        &self,
        user_id: Uuid,
        preferred_types: &[Uuid],
    ) -> AppResult<UserPreferences> {
        let preferences = sqlx::query_as::<_, UserPreferences>(
            "INSERT INTO user_preferences (user_id, preferred_types) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE \
             SET preferred_types = EXCLUDED.preferred_types, updated_at = NOW() \
             RETURNING preferred_types",
        )
        .bind(user_id)
        .bind(preferred_types)
        .fetch_one(&self.pool)
        .await?;

        Ok(preferences)
    }
}
