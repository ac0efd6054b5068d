use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{
        review::{MAX_RATING, MAX_REVIEW_CHARS, MIN_RATING, MIN_REVIEW_CHARS},
        PostedReview,
    },
    routes::AppState,
};

/// Body of `POST /api/reviews`
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddReviewRequest {
    pub game_id: Uuid,
    #[validate(length(min = MIN_REVIEW_CHARS, max = MAX_REVIEW_CHARS))]
    pub review_text: String,
    #[validate(range(min = MIN_RATING, max = MAX_RATING))]
    pub rating: i32,
}

pub async fn add_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<AddReviewRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PostedReview>)> {
    let Json(request) = body?;
    request
        .validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    if request.review_text.trim().is_empty() {
        return Err(AppError::InvalidInput("Review text cannot be blank".to_string()));
    }

    let posted = state
        .reviews
        .add(
            user.0,
            request.game_id,
            request.review_text.trim(),
            request.rating,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(posted)))
}

pub async fn remove_review(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    review_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(review_id) = review_id?;
    state.reviews.remove(user.0, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(review_text: &str, rating: i32) -> AddReviewRequest {
        AddReviewRequest {
            game_id: Uuid::new_v4(),
            review_text: review_text.to_string(),
            rating,
        }
    }

    #[test]
    fn test_review_text_bounds() {
        assert!(request("", 3).validate().is_err());
        assert!(request("x", 3).validate().is_ok());
        assert!(request(&"x".repeat(1000), 3).validate().is_ok());
        assert!(request(&"x".repeat(1001), 3).validate().is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(request("Good", 0).validate().is_err());
        assert!(request("Good", 1).validate().is_ok());
        assert!(request("Good", 5).validate().is_ok());
        assert!(request("Good", 6).validate().is_err());
    }

    #[test]
    fn test_body_uses_camel_case() {
        let game_id = Uuid::new_v4();
        let request: AddReviewRequest = serde_json::from_value(serde_json::json!({
            "gameId": game_id,
            "reviewText": "Great",
            "rating": 5
        }))
        .unwrap();
        assert_eq!(request.game_id, game_id);
        assert_eq!(request.review_text, "Great");
    }
}
