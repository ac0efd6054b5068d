use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_GAMES_LIMIT: u32 = 9;
pub const MAX_GAMES_LIMIT: u32 = 50;

/// A row of the board game catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardGame {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub min_players: i32,
    pub max_players: i32,
    /// Play time in minutes
    pub duration: i32,
    pub complexity: i32,
    pub types: Vec<String>,
    pub is_archived: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog row derived from a recommendation, ready for insertion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBoardGame {
    pub title: String,
    pub description: String,
    pub min_players: i32,
    pub max_players: i32,
    pub duration: i32,
    pub complexity: i32,
    pub types: Vec<String>,
    pub created_by: Option<Uuid>,
}

/// Identity of a catalog row returned by inserts
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct GameRef {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameType {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub name: String,
}

/// Catalog columns a listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameSortField {
    #[default]
    Title,
    Complexity,
    MinPlayers,
    MaxPlayers,
    Duration,
}

impl GameSortField {
    /// Unknown values fall back to ordering by title
    pub fn from_param(value: &str) -> Self {
        match value {
            "complexity" => GameSortField::Complexity,
            "min_players" => GameSortField::MinPlayers,
            "max_players" => GameSortField::MaxPlayers,
            "duration" => GameSortField::Duration,
            _ => GameSortField::Title,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            GameSortField::Title => "title",
            GameSortField::Complexity => "complexity",
            GameSortField::MinPlayers => "min_players",
            GameSortField::MaxPlayers => "max_players",
            GameSortField::Duration => "duration",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Normalized catalog listing request
#[derive(Debug, Clone, PartialEq)]
pub struct GameQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort_by: GameSortField,
    pub sort_order: SortOrder,
}

impl GameQuery {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

impl Default for GameQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_GAMES_LIMIT,
            search: None,
            sort_by: GameSortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardGameList {
    pub games: Vec<BoardGame>,
    pub pagination: Pagination,
}

/// Key used to decide whether two titles name the same catalog game
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
