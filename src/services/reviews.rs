use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{GameCatalog, ReviewsStore},
    error::{AppError, AppResult},
    models::{PostedReview, Review},
};

#[derive(Clone)]
pub struct ReviewsService {
    reviews: Arc<dyn ReviewsStore>,
    catalog: Arc<dyn GameCatalog>,
}

impl ReviewsService {
    pub fn new(reviews: Arc<dyn ReviewsStore>, catalog: Arc<dyn GameCatalog>) -> Self {
        Self { reviews, catalog }
    }

    /// Stores a review and the accompanying rating
    ///
    /// One review per user and game. A rating that fails to save is logged
    /// and reported as `None`; the review is kept.
    pub async fn add(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        review_text: &str,
        rating: i32,
    ) -> AppResult<PostedReview> {
        if self.catalog.get_game(game_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Game {} not found", game_id)));
        }

        if self
            .reviews
            .find_user_review(user_id, game_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Game has already been reviewed".to_string()));
        }

        let review = self
            .reviews
            .insert_review(user_id, game_id, review_text)
            .await?;

        let rating = match self.reviews.upsert_rating(user_id, game_id, rating).await {
            Ok(()) => Some(rating),
            Err(e) => {
                tracing::warn!(error = %e, review_id = %review.id, "Failed to store rating");
                None
            }
        };

        tracing::info!(user_id = %user_id, game_id = %game_id, "Added review");
        Ok(PostedReview { review, rating })
    }

    /// Deletes a review written by `user_id`, together with their rating of the game
    pub async fn remove(&self, user_id: Uuid, review_id: Uuid) -> AppResult<()> {
        let review: Review = self
            .reviews
            .get_review(review_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review_id)))?;

        if review.user_id != user_id {
            return Err(AppError::Forbidden(
                "Reviews can only be deleted by their author".to_string(),
            ));
        }

        if let Err(e) = self.reviews.delete_rating(user_id, review.game_id).await {
            tracing::warn!(error = %e, review_id = %review_id, "Failed to delete rating");
        }

        self.reviews.delete_review(review_id).await?;
        tracing::info!(user_id = %user_id, review_id = %review_id, "Deleted review");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{catalog::MockGameCatalog, reviews::MockReviewsStore},
        models::BoardGame,
    };
    use chrono::Utc;

    fn board_game(id: Uuid) -> BoardGame {
        BoardGame {
            id,
            title: "Cascadia".to_string(),
            description: String::new(),
            min_players: 1,
            max_players: 4,
            duration: 45,
            complexity: 2,
            types: Vec::new(),
            is_archived: false,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(user_id: Uuid, game_id: Uuid, text: &str) -> Review {
        Review {
            id: Uuid::new_v4(),
            user_id,
            game_id,
            review_text: text.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog_with_game() -> MockGameCatalog {
        let mut catalog = MockGameCatalog::new();
        catalog
            .expect_get_game()
            .returning(|id| Ok(Some(board_game(id))));
        catalog
    }

    #[tokio::test]
    async fn test_add_for_unknown_game_is_not_found() {
        let mut catalog = MockGameCatalog::new();
        catalog.expect_get_game().returning(|_| Ok(None));
        let mut reviews = MockReviewsStore::new();
        reviews.expect_insert_review().never();

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(catalog));
        let result = service.add(Uuid::new_v4(), Uuid::new_v4(), "Fun", 4).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_second_review_is_a_conflict() {
        let mut reviews = MockReviewsStore::new();
        reviews
            .expect_find_user_review()
            .returning(|user, game| Ok(Some(review(user, game, "Fun"))));
        reviews.expect_insert_review().never();

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(catalog_with_game()));
        let result = service.add(Uuid::new_v4(), Uuid::new_v4(), "Again", 5).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_add_stores_review_and_rating() {
        let user_id = Uuid::new_v4();
        let mut reviews = MockReviewsStore::new();
        reviews.expect_find_user_review().returning(|_, _| Ok(None));
        reviews
            .expect_insert_review()
            .times(1)
            .returning(|user, game, text: &str| Ok(review(user, game, text)));
        reviews
            .expect_upsert_rating()
            .withf(|_, _, rating| *rating == 4)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(catalog_with_game()));
        let posted = service
            .add(user_id, Uuid::new_v4(), "Lovely puzzle", 4)
            .await
            .unwrap();
        assert_eq!(posted.review.user_id, user_id);
        assert_eq!(posted.review.review_text, "Lovely puzzle");
        assert_eq!(posted.rating, Some(4));
    }

    #[tokio::test]
    async fn test_rating_failure_keeps_the_review() {
        let mut reviews = MockReviewsStore::new();
        reviews.expect_find_user_review().returning(|_, _| Ok(None));
        reviews
            .expect_insert_review()
            .returning(|user, game, text: &str| Ok(review(user, game, text)));
        reviews
            .expect_upsert_rating()
            .returning(|_, _, _| Err(AppError::Internal("ratings unavailable".to_string())));

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(catalog_with_game()));
        let posted = service
            .add(Uuid::new_v4(), Uuid::new_v4(), "Still fun", 3)
            .await
            .unwrap();
        assert_eq!(posted.rating, None);
    }

    #[tokio::test]
    async fn test_only_the_author_can_delete() {
        let author = Uuid::new_v4();
        let mut reviews = MockReviewsStore::new();
        reviews
            .expect_get_review()
            .returning(move |_| Ok(Some(review(author, Uuid::new_v4(), "Mine"))));
        reviews.expect_delete_review().never();

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(MockGameCatalog::new()));
        let result = service.remove(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_rating_then_review() {
        let author = Uuid::new_v4();
        let game_id = Uuid::new_v4();
        let mut reviews = MockReviewsStore::new();
        reviews
            .expect_get_review()
            .returning(move |_| Ok(Some(review(author, game_id, "Mine"))));
        reviews
            .expect_delete_rating()
            .withf(move |user, game| *user == author && *game == game_id)
            .times(1)
            .returning(|_, _| Err(AppError::Internal("ratings unavailable".to_string())));
        reviews
            .expect_delete_review()
            .times(1)
            .returning(|_| Ok(true));

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(MockGameCatalog::new()));
        service.remove(author, Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_review_is_not_found() {
        let mut reviews = MockReviewsStore::new();
        reviews.expect_get_review().returning(|_| Ok(None));

        let service = ReviewsService::new(Arc::new(reviews), Arc::new(MockGameCatalog::new()));
        let result = service.remove(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
