use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    db::postgres::escape_like,
    error::AppResult,
    models::{normalize_title, BoardGame, GameQuery, GameRef, GameType, NewBoardGame},
};

const GAME_COLUMNS: &str = "id, title, description, min_players, max_players, duration, \
     complexity, types, is_archived, created_by, created_at, updated_at";

/// Access to the board game catalog
///
/// Titles are compared in normalized form (trimmed, lowercased) everywhere.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameCatalog: Send + Sync {
    /// Returns the catalog titles matching any of the given titles
    async fn existing_titles(&self, titles: &[String]) -> AppResult<Vec<String>>;

    /// Looks up a single game by title
    async fn find_by_title(&self, title: &str) -> AppResult<Option<GameRef>>;

    /// Inserts all games in a single statement; either every row lands or none
    async fn insert_games(&self, games: &[NewBoardGame]) -> AppResult<Vec<GameRef>>;

    async fn insert_game(&self, game: &NewBoardGame) -> AppResult<GameRef>;

    /// Non-archived games for one page, plus the total number of matches
    async fn list_games(&self, query: &GameQuery) -> AppResult<(Vec<BoardGame>, i64)>;

    /// Fetches a game by id, archived or not
    async fn get_game(&self, id: Uuid) -> AppResult<Option<BoardGame>>;

    async fn list_game_types(&self) -> AppResult<Vec<GameType>>;
}

/// Postgres-backed catalog
#[derive(Clone)]
pub struct PgGameCatalog {
    pool: PgPool,
}

impl PgGameCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl GameCatalog for PgGameCatalog {
    async fn existing_titles(&self, titles: &[String]) -> AppResult<Vec<String>> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }

        let normalized: Vec<String> = titles.iter().map(|t| normalize_title(t)).collect();
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT title FROM board_games WHERE lower(btrim(title)) = ANY($1)",
        )
        .bind(normalized)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<GameRef>> {
        let game = sqlx::query_as::<_, GameRef>(
            "SELECT id, title FROM board_games WHERE lower(btrim(title)) = $1 LIMIT 1",
        )
        .bind(normalize_title(title))
        .fetch_optional(&self.pool)
        .await?;

        Ok(game)
    }

    async fn insert_games(&self, games: &[NewBoardGame]) -> AppResult<Vec<GameRef>> {
        if games.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO board_games \
             (title, description, min_players, max_players, duration, complexity, types, created_by) ",
        );
        builder.push_values(games, |mut row, game| {
            row.push_bind(game.title.clone())
                .push_bind(game.description.clone())
                .push_bind(game.min_players)
                .push_bind(game.max_players)
                .push_bind(game.duration)
                .push_bind(game.complexity)
                .push_bind(game.types.clone())
                .push_bind(game.created_by);
        });
        builder.push(" RETURNING id, title");

        let inserted = builder
            .build_query_as::<GameRef>()
            .fetch_all(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn insert_game(&self, game: &NewBoardGame) -> AppResult<GameRef> {
        let inserted = sqlx::query_as::<_, GameRef>(
            r#"
            INSERT INTO board_games
                (title, description, min_players, max_players, duration, complexity, types, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title
            "#,
        )
        .bind(&game.title)
        .bind(&game.description)
        .bind(game.min_players)
        .bind(game.max_players)
        .bind(game.duration)
        .bind(game.complexity)
        .bind(&game.types)
        .bind(game.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn list_games(&self, query: &GameQuery) -> AppResult<(Vec<BoardGame>, i64)> {
        let pattern = query
            .search
            .as_deref()
            .map(|search| format!("%{}%", escape_like(search)));

        // Column and direction come from whitelisted enums, never from raw input
        let sql = format!(
            "SELECT {GAME_COLUMNS} FROM board_games \
             WHERE is_archived = FALSE AND ($1::text IS NULL OR title ILIKE $1) \
             ORDER BY {} {}, id \
             LIMIT $2 OFFSET $3",
            query.sort_by.column(),
            query.sort_order.keyword(),
        );

        let games = sqlx::query_as::<_, BoardGame>(&sql)
            .bind(&pattern)
            .bind(i64::from(query.limit))
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM board_games \
             WHERE is_archived = FALSE AND ($1::text IS NULL OR title ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((games, total))
    }

    async fn get_game(&self, id: Uuid) -> AppResult<Option<BoardGame>> {
        let sql = format!("SELECT {GAME_COLUMNS} FROM board_games WHERE id = $1");
        let game = sqlx::query_as::<_, BoardGame>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(game)
    }

    async fn list_game_types(&self) -> AppResult<Vec<GameType>> {
        let types =
            sqlx::query_as::<_, GameType>("SELECT id, type FROM game_types ORDER BY type ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(types)
    }
}
