use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::AppResult, middleware::CurrentUser, models::UserPreferences, routes::AppState};

/// Body of `PUT /api/preferences`
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub preferred_types: Vec<Uuid>,
}

pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserPreferences>> {
    let preferences = state.preferences.get(user.0).await?;
    Ok(Json(preferences))
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<UpdatePreferencesRequest>, JsonRejection>,
) -> AppResult<Json<UserPreferences>> {
    let Json(request) = body?;
    let preferences = state
        .preferences
        .update(user.0, request.preferred_types)
        .await?;
    Ok(Json(preferences))
}
