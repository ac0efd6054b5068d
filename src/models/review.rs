use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_REVIEW_CHARS: u64 = 1;
pub const MAX_REVIEW_CHARS: u64 = 1000;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A user's written review of a catalog game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub review_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of posting a review
///
/// `rating` is `None` when the rating row could not be stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostedReview {
    #[serde(flatten)]
    pub review: Review,
    pub rating: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posted_review_flattens_the_review() {
        let posted = PostedReview {
            review: Review {
                id: Uuid::nil(),
                user_id: Uuid::nil(),
                game_id: Uuid::nil(),
                review_text: "Great tile drafting".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            rating: Some(4),
        };

        let json = serde_json::to_value(&posted).unwrap();
        assert_eq!(json["review_text"], "Great tile drafting");
        assert_eq!(json["rating"], 4);
        assert!(json.get("review").is_none());
    }
}
