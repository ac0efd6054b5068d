use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{FavoritesStore, GameCatalog},
    error::{AppError, AppResult},
    models::{FavoriteGame, FavoritesQuery, Page},
};

/// Favorite games of a single user
#[derive(Clone)]
pub struct FavoritesService {
    favorites: Arc<dyn FavoritesStore>,
    catalog: Arc<dyn GameCatalog>,
}

impl FavoritesService {
    pub fn new(favorites: Arc<dyn FavoritesStore>, catalog: Arc<dyn GameCatalog>) -> Self {
        Self { favorites, catalog }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: &FavoritesQuery,
    ) -> AppResult<Page<FavoriteGame>> {
        self.favorites.list_favorites(user_id, query).await
    }

    /// Adds a live catalog game to the user's favorites
    pub async fn add(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        notes: Option<String>,
    ) -> AppResult<FavoriteGame> {
        let game = self
            .catalog
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Game {} not found", game_id)))?;

        if game.is_archived {
            return Err(AppError::InvalidInput(
                "Archived games cannot be added to favorites".to_string(),
            ));
        }

        if self.favorites.is_favorite(user_id, game_id).await? {
            return Err(AppError::Conflict("Game is already a favorite".to_string()));
        }

        let favorite = self.favorites.add_favorite(user_id, game_id, notes).await?;
        tracing::info!(user_id = %user_id, game_id = %game_id, "Added favorite game");

        Ok(favorite)
    }

    /// Removing a game that is not a favorite is a no-op
    pub async fn remove(&self, user_id: Uuid, game_id: Uuid) -> AppResult<()> {
        let removed = self.favorites.remove_favorite(user_id, game_id).await?;
        tracing::info!(user_id = %user_id, game_id = %game_id, removed, "Removed favorite game");
        Ok(())
    }

    pub async fn is_favorite(&self, user_id: Uuid, game_id: Uuid) -> AppResult<bool> {
        self.favorites.is_favorite(user_id, game_id).await
    }
}
