use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::GameCatalog,
    error::{AppError, AppResult},
    models::{BoardGame, BoardGameList, GameQuery, GameType, Pagination},
};

/// Read access to the public game catalog
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn GameCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn GameCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn list_games(&self, query: &GameQuery) -> AppResult<BoardGameList> {
        let (games, total) = self.catalog.list_games(query).await?;

        tracing::debug!(
            page = query.page,
            limit = query.limit,
            total,
            "Listed catalog games"
        );

        Ok(BoardGameList {
            games,
            pagination: Pagination {
                page: query.page,
                limit: query.limit,
                total,
            },
        })
    }

    /// Archived games are treated as missing
    pub async fn get_game(&self, id: Uuid) -> AppResult<BoardGame> {
        match self.catalog.get_game(id).await? {
            Some(game) if !game.is_archived => Ok(game),
            _ => Err(AppError::NotFound(format!("Game {} not found", id))),
        }
    }

    pub async fn list_game_types(&self) -> AppResult<Vec<GameType>> {
        self.catalog.list_game_types().await
    }
}
