use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{
        favorite::{DEFAULT_FAVORITES_LIMIT, MAX_FAVORITES_LIMIT},
        FavoriteGame, FavoriteSort, FavoritesQuery, Page,
    },
    routes::AppState,
};

const MAX_NOTES_CHARS: u64 = 1000;

/// Query string of `GET /api/favorites`
#[derive(Debug, Default, Deserialize)]
pub struct FavoritesParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<FavoriteSort>,
}

impl FavoritesParams {
    /// Unlike the catalog listing, out-of-range values are rejected
    pub fn into_query(self) -> AppResult<FavoritesQuery> {
        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(i64::from(DEFAULT_FAVORITES_LIMIT));

        let page = u32::try_from(page)
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(|| AppError::InvalidInput("page must be at least 1".to_string()))?;
        let limit = u32::try_from(limit)
            .ok()
            .filter(|limit| (1..=MAX_FAVORITES_LIMIT).contains(limit))
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "limit must be between 1 and {}",
                    MAX_FAVORITES_LIMIT
                ))
            })?;

        Ok(FavoritesQuery {
            page,
            limit,
            sort: self.sort.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub game_id: Uuid,
    #[validate(length(max = MAX_NOTES_CHARS))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFavoriteParams {
    pub game_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFavoriteResponse {
    pub is_favorite: bool,
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    params: Result<Query<FavoritesParams>, QueryRejection>,
) -> AppResult<Json<Page<FavoriteGame>>> {
    let Query(params) = params?;
    let query = params.into_query()?;
    let page = state.favorites.list(user.0, &query).await?;
    Ok(Json(page))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<FavoriteGame>)> {
    let Json(request) = body?;
    request
        .validate()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let favorite = state
        .favorites
        .add(user.0, request.game_id, request.notes)
        .await?;

    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    game_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(game_id) = game_id?;
    state.favorites.remove(user.0, game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn check_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    params: Result<Query<CheckFavoriteParams>, QueryRejection>,
) -> AppResult<Json<CheckFavoriteResponse>> {
    let Query(params) = params?;
    let is_favorite = state.favorites.is_favorite(user.0, params.game_id).await?;
    Ok(Json(CheckFavoriteResponse { is_favorite }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = FavoritesParams::default().into_query().unwrap();
        assert_eq!(query, FavoritesQuery::default());
    }

    #[test]
    fn test_out_of_range_params_are_rejected() {
        let params = FavoritesParams {
            limit: Some(101),
            ..FavoritesParams::default()
        };
        assert!(matches!(params.into_query(), Err(AppError::InvalidInput(_))));

        let params = FavoritesParams {
            page: Some(0),
            ..FavoritesParams::default()
        };
        assert!(matches!(params.into_query(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_title_sort() {
        let query = FavoritesParams {
            page: Some(2),
            limit: Some(100),
            sort: Some(FavoriteSort::Title),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.sort, FavoriteSort::Title);
        assert_eq!(query.offset(), 100);
    }
}
