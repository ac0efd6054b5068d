use sqlx::PgPool;

use crate::{error::AppResult, models::ErrorLogEntry};

/// Append-only sink for recommendation failure records
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ErrorLogStore: Send + Sync {
    async fn insert_error_log(&self, entry: &ErrorLogEntry) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgErrorLogStore {
    pool: PgPool,
}

impl PgErrorLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ErrorLogStore for PgErrorLogStore {
    async fn insert_error_log(&self, entry: &ErrorLogEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO recommendation_error_logs
                (error_code, error_message, model, description_hash, description_length, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&entry.error_code)
        .bind(&entry.error_message)
        .bind(&entry.model)
        .bind(&entry.description_hash)
        .bind(entry.description_length)
        .bind(entry.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
