use std::sync::Arc;

use uuid::Uuid;

use crate::{
    error::{AppError, ErrorCode, RecommendationError},
    models::{PreferenceInput, RecommendationItem, RecommendationsResponse},
    services::{
        error_log::ErrorLogger,
        llm::{ChatGateway, ChatMessage},
        persistence::CatalogWriter,
        prompt::{build_prompt, response_format},
        response_parser::parse_recommendations,
    },
};

/// Generates board game recommendations from user preferences
///
/// Pipeline: prompt → gateway → parser → catalog write. Any failure before
/// the catalog write is audited and returned; the catalog write itself is
/// best-effort and never changes the outcome.
#[derive(Clone)]
pub struct RecommendationService {
    gateway: Arc<dyn ChatGateway>,
    writer: CatalogWriter,
    error_logger: ErrorLogger,
    recommendation_count: u32,
}

impl RecommendationService {
    pub fn new(
        gateway: Arc<dyn ChatGateway>,
        writer: CatalogWriter,
        error_logger: ErrorLogger,
        recommendation_count: u32,
    ) -> Self {
        Self {
            gateway,
            writer,
            error_logger,
            recommendation_count,
        }
    }

    pub async fn recommend(
        &self,
        input: &PreferenceInput,
        user_id: Uuid,
    ) -> Result<RecommendationsResponse, RecommendationError> {
        let recommendations = match self.generate(input).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                tracing::error!(
                    code = %e.code,
                    error = %e.message,
                    "Recommendation pipeline failed"
                );
                self.error_logger
                    .log(&e, &self.gateway.model(), &input.description, user_id)
                    .await;
                return Err(e);
            }
        };

        tracing::info!(
            count = recommendations.len(),
            first = recommendations.first().map(|r| r.title.as_str()).unwrap_or_default(),
            "Generated recommendations"
        );

        self.writer.persist(&recommendations, Some(user_id)).await;

        Ok(RecommendationsResponse { recommendations })
    }

    async fn generate(
        &self,
        input: &PreferenceInput,
    ) -> Result<Vec<RecommendationItem>, RecommendationError> {
        let prompt = build_prompt(input, self.recommendation_count);

        tracing::info!(
            model = %self.gateway.model(),
            description_length = input.description.chars().count(),
            "Requesting recommendations"
        );

        let reply = self
            .gateway
            .generate(vec![ChatMessage::user(prompt)], Some(response_format()), None)
            .await
            .map_err(pipeline_error)?;

        parse_recommendations(&reply)
    }
}

fn pipeline_error(err: AppError) -> RecommendationError {
    match err {
        AppError::Recommendation(e) => e,
        AppError::HttpClient(e) => RecommendationError::new(
            ErrorCode::ApiCommunicationError,
            format!("Communication with the model failed: {}", e),
        ),
        other => RecommendationError::new(
            ErrorCode::UnexpectedError,
            format!("Unexpected error: {}", other),
        ),
    }
}
