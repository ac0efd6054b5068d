use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{db::ErrorLogStore, error::RecommendationError, models::ErrorLogEntry};

/// Audits recommendation failures without ever failing itself
#[derive(Clone)]
pub struct ErrorLogger {
    store: Arc<dyn ErrorLogStore>,
}

impl ErrorLogger {
    pub fn new(store: Arc<dyn ErrorLogStore>) -> Self {
        Self { store }
    }

    /// Records the failure; validation and store errors only reach the log output
    pub async fn log(
        &self,
        error: &RecommendationError,
        model: &str,
        description: &str,
        user_id: Uuid,
    ) {
        let entry = ErrorLogEntry::new(
            error.code.as_str(),
            &error.message,
            model,
            description,
            user_id,
        );

        if let Err(e) = entry.validate() {
            tracing::error!(
                code = %error.code,
                error = %e,
                "Error log entry failed validation"
            );
            return;
        }

        match self.store.insert_error_log(&entry).await {
            Ok(()) => tracing::debug!(code = %error.code, "Recorded recommendation failure"),
            Err(e) => tracing::error!(
                code = %error.code,
                error = %e,
                "Failed to record recommendation failure"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::error_log::MockErrorLogStore,
        error::{AppError, ErrorCode},
    };

    fn gateway_error() -> RecommendationError {
        RecommendationError::new(ErrorCode::ApiCommunicationError, "gateway down")
    }

    #[tokio::test]
    async fn test_log_inserts_hashed_entry() {
        let description = "d".repeat(250);
        let expected_hash = crate::models::hash_description(&description);

        let mut store = MockErrorLogStore::new();
        store
            .expect_insert_error_log()
            .withf(move |entry| {
                entry.error_code == "API_COMMUNICATION_ERROR"
                    && entry.description_hash == expected_hash
                    && entry.description_length == 250
                    && entry.model == "openai/gpt-4o-mini"
            })
            .times(1)
            .returning(|_| Ok(()));

        let logger = ErrorLogger::new(Arc::new(store));
        logger
            .log(&gateway_error(), "openai/gpt-4o-mini", &description, Uuid::nil())
            .await;
    }

    #[tokio::test]
    async fn test_invalid_entry_is_not_inserted() {
        let mut store = MockErrorLogStore::new();
        store.expect_insert_error_log().never();

        let logger = ErrorLogger::new(Arc::new(store));
        // An over-long model name fails validation
        logger
            .log(&gateway_error(), &"m".repeat(80), "description", Uuid::nil())
            .await;
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let mut store = MockErrorLogStore::new();
        store
            .expect_insert_error_log()
            .times(1)
            .returning(|_| Err(AppError::Internal("db down".to_string())));

        let logger = ErrorLogger::new(Arc::new(store));
        logger
            .log(&gateway_error(), "m", "description", Uuid::nil())
            .await;
    }
}
