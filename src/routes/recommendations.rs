use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use validator::{Validate, ValidationErrors};

use crate::{
    error::{AppError, AppResult, ErrorCode, RecommendationError},
    middleware::CurrentUser,
    models::{
        recommendation::{
            DEFAULT_COMPLEXITY, DEFAULT_DURATION, DEFAULT_GAME_TYPE, DEFAULT_PLAYERS,
            MAX_DESCRIPTION_CHARS, MIN_DESCRIPTION_CHARS,
        },
        PreferenceInput, RecommendationsResponse,
    },
    routes::AppState,
};

/// Body of `POST /api/recommendations`
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[serde(default)]
    #[validate(length(min = MIN_DESCRIPTION_CHARS, max = MAX_DESCRIPTION_CHARS))]
    pub description: String,
    #[validate(range(min = 1, max = 12))]
    pub players: Option<i64>,
    /// Maximum play time in minutes
    #[validate(range(min = 15, max = 240))]
    pub duration: Option<i64>,
    #[validate(range(min = 1, max = 5))]
    pub complexity: Option<i64>,
    #[validate(length(min = 1, max = 5))]
    pub types: Option<Vec<String>>,
}

impl RecommendationRequest {
    /// Checks the body, mapping the first failing field to its error code
    pub fn check(&self) -> Result<(), RecommendationError> {
        if self.description.trim().is_empty() {
            return Err(RecommendationError::new(
                ErrorCode::InvalidDescription,
                "Description is required",
            ));
        }

        self.validate()
            .map_err(|errors| self.validation_error(&errors))
    }

    fn validation_error(&self, errors: &ValidationErrors) -> RecommendationError {
        let fields = errors.field_errors();
        let length = self.description.chars().count();

        let (code, message) = if fields.contains_key("description") {
            if (length as u64) < MIN_DESCRIPTION_CHARS {
                (
                    ErrorCode::DescriptionTooShort,
                    format!(
                        "Description is too short (minimum {} characters)",
                        MIN_DESCRIPTION_CHARS
                    ),
                )
            } else {
                (
                    ErrorCode::DescriptionTooLong,
                    format!(
                        "Description is too long (maximum {} characters)",
                        MAX_DESCRIPTION_CHARS
                    ),
                )
            }
        } else if fields.contains_key("players") {
            (
                ErrorCode::InvalidPlayersCount,
                "Invalid number of players (range 1-12)".to_string(),
            )
        } else if fields.contains_key("duration") {
            (
                ErrorCode::InvalidDuration,
                "Invalid play time (range 15-240 minutes)".to_string(),
            )
        } else if fields.contains_key("complexity") {
            (
                ErrorCode::InvalidComplexity,
                "Invalid complexity level (range 1-5)".to_string(),
            )
        } else {
            (
                ErrorCode::InvalidTypes,
                "Between 1 and 5 game types are allowed".to_string(),
            )
        };

        RecommendationError::new(code, message).with_details(json!({
            "fields": errors,
            "descriptionLength": length,
        }))
    }

    /// Applies defaults for the omitted preferences
    pub fn into_input(self) -> PreferenceInput {
        PreferenceInput {
            description: self.description,
            players: self
                .players
                .and_then(|p| u32::try_from(p).ok())
                .unwrap_or(DEFAULT_PLAYERS),
            duration: self
                .duration
                .and_then(|d| u32::try_from(d).ok())
                .unwrap_or(DEFAULT_DURATION),
            complexity: self
                .complexity
                .and_then(|c| u8::try_from(c).ok())
                .unwrap_or(DEFAULT_COMPLEXITY),
            types: self
                .types
                .unwrap_or_else(|| vec![DEFAULT_GAME_TYPE.to_string()]),
        }
    }
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationsResponse>> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected malformed recommendation request");
        AppError::from(
            RecommendationError::new(ErrorCode::InvalidInput, "Invalid input")
                .with_details(json!({ "body": rejection.body_text() })),
        )
    })?;

    if let Err(e) = request.check() {
        tracing::warn!(code = %e.code, "Recommendation request failed validation");
        return Err(e.into());
    }

    let input = request.into_input();
    let response = state.recommendations.recommend(&input, user.0).await?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(description: &str) -> RecommendationRequest {
        RecommendationRequest {
            description: description.to_string(),
            players: None,
            duration: None,
            complexity: None,
            types: None,
        }
    }

    fn check_code(request: &RecommendationRequest) -> Option<ErrorCode> {
        request.check().err().map(|e| e.code)
    }

    #[test]
    fn test_description_bounds() {
        assert_eq!(check_code(&request("")), Some(ErrorCode::InvalidDescription));
        assert_eq!(check_code(&request("   ")), Some(ErrorCode::InvalidDescription));
        assert_eq!(
            check_code(&request(&"a".repeat(199))),
            Some(ErrorCode::DescriptionTooShort)
        );
        assert_eq!(check_code(&request(&"a".repeat(200))), None);
        assert_eq!(check_code(&request(&"a".repeat(10_000))), None);
        assert_eq!(
            check_code(&request(&"a".repeat(10_001))),
            Some(ErrorCode::DescriptionTooLong)
        );
    }

    #[test]
    fn test_description_length_counts_characters() {
        // 200 two-byte characters
        assert_eq!(check_code(&request(&"ż".repeat(200))), None);
    }

    #[test]
    fn test_range_errors_map_to_codes() {
        let valid = "a".repeat(250);

        let mut r = request(&valid);
        r.players = Some(13);
        assert_eq!(check_code(&r), Some(ErrorCode::InvalidPlayersCount));

        let mut r = request(&valid);
        r.duration = Some(10);
        assert_eq!(check_code(&r), Some(ErrorCode::InvalidDuration));

        let mut r = request(&valid);
        r.complexity = Some(0);
        assert_eq!(check_code(&r), Some(ErrorCode::InvalidComplexity));

        let mut r = request(&valid);
        r.types = Some(Vec::new());
        assert_eq!(check_code(&r), Some(ErrorCode::InvalidTypes));

        let mut r = request(&valid);
        r.types = Some((0..6).map(|i| format!("type-{i}")).collect());
        assert_eq!(check_code(&r), Some(ErrorCode::InvalidTypes));
    }

    #[test]
    fn test_defaults_are_applied() {
        let input = request(&"a".repeat(250)).into_input();
        assert_eq!(input.players, 4);
        assert_eq!(input.duration, 60);
        assert_eq!(input.complexity, 3);
        assert_eq!(input.types, vec!["strategy"]);
    }

    #[test]
    fn test_error_details_list_failing_fields() {
        let mut r = request(&"a".repeat(250));
        r.players = Some(0);
        let err = r.check().unwrap_err();
        let details = err.details.unwrap();
        assert!(details["fields"].get("players").is_some());
        assert_eq!(details["descriptionLength"], 250);
    }
}
