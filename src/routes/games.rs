use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        game::{DEFAULT_GAMES_LIMIT, MAX_GAMES_LIMIT},
        BoardGame, BoardGameList, GameQuery, GameSortField, GameType, SortOrder,
    },
    routes::AppState,
};

/// Query string of `GET /api/games`
///
/// Out-of-range values are clamped rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl GameListParams {
    pub fn into_query(self) -> GameQuery {
        let page = self.page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let limit = self
            .limit
            .unwrap_or(i64::from(DEFAULT_GAMES_LIMIT))
            .clamp(1, i64::from(MAX_GAMES_LIMIT));

        GameQuery {
            page: page as u32,
            limit: limit as u32,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort_by: self
                .sort_by
                .as_deref()
                .map(GameSortField::from_param)
                .unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .map(SortOrder::from_param)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameTypesResponse {
    pub types: Vec<GameType>,
}

/// Handler for the paginated catalog listing
pub async fn list_games(
    State(state): State<AppState>,
    params: Result<Query<GameListParams>, QueryRejection>,
) -> AppResult<Json<BoardGameList>> {
    let Query(params) = params?;
    let query = params.into_query();
    let list = state.catalog.list_games(&query).await?;
    Ok(Json(list))
}

pub async fn get_game(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<BoardGame>> {
    let Path(id) = id?;
    let game = state.catalog.get_game(id).await?;
    Ok(Json(game))
}

pub async fn list_game_types(State(state): State<AppState>) -> AppResult<Json<GameTypesResponse>> {
    let types = state.catalog.list_game_types().await?;
    Ok(Json(GameTypesResponse { types }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = GameListParams::default().into_query();
        assert_eq!(query, GameQuery::default());
    }

    #[test]
    fn test_limit_and_page_are_clamped() {
        let query = GameListParams {
            page: Some(-3),
            limit: Some(500),
            ..GameListParams::default()
        }
        .into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 50);

        let query = GameListParams {
            limit: Some(0),
            ..GameListParams::default()
        }
        .into_query();
        assert_eq!(query.limit, 1);
    }

    #[test]
    fn test_sorting_and_search() {
        let query = GameListParams {
            search: Some("  catan ".to_string()),
            sort_by: Some("duration".to_string()),
            sort_order: Some("desc".to_string()),
            ..GameListParams::default()
        }
        .into_query();
        assert_eq!(query.search.as_deref(), Some("catan"));
        assert_eq!(query.sort_by, GameSortField::Duration);
        assert_eq!(query.sort_order, SortOrder::Desc);

        let query = GameListParams {
            search: Some("   ".to_string()),
            sort_by: Some("id; --".to_string()),
            ..GameListParams::default()
        }
        .into_query();
        assert_eq!(query.search, None);
        assert_eq!(query.sort_by, GameSortField::Title);
    }
}
