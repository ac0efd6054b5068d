use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BoardGame;

pub const DEFAULT_FAVORITES_LIMIT: u32 = 10;
pub const MAX_FAVORITES_LIMIT: u32 = 100;

/// A game saved by a user, with the catalog row embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteGame {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub notes: Option<String>,
    pub added_at: DateTime<Utc>,
    pub game: BoardGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FavoriteSort {
    /// Most recently added first
    #[default]
    AddedAt,
    /// Game title, alphabetical
    Title,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesQuery {
    pub page: u32,
    pub limit: u32,
    pub sort: FavoriteSort,
}

impl FavoritesQuery {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for FavoritesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_FAVORITES_LIMIT,
            sort: FavoriteSort::default(),
        }
    }
}

/// Paginated result in the `{items, total, page, limit}` shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_sort_param_names() {
        let sort: FavoriteSort = serde_json::from_str("\"addedAt\"").unwrap();
        assert_eq!(sort, FavoriteSort::AddedAt);
        let sort: FavoriteSort = serde_json::from_str("\"title\"").unwrap();
        assert_eq!(sort, FavoriteSort::Title);
        assert!(serde_json::from_str::<FavoriteSort>("\"rating\"").is_err());
    }
}
