use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{ErrorLogStore, FavoritesStore, GameCatalog, PreferencesStore, ReviewsStore},
    middleware::{current_user_middleware, make_span_with_request_id, request_id_middleware},
    services::{
        CatalogService, CatalogWriter, ChatGateway, ErrorLogger, FavoritesService,
        PreferencesService, RecommendationService, ReviewsService,
    },
};

pub mod favorites;
pub mod games;
pub mod preferences;
pub mod recommendations;
pub mod reviews;

/// Storage backends the services run on
#[derive(Clone)]
pub struct Stores {
    pub games: Arc<dyn GameCatalog>,
    pub favorites: Arc<dyn FavoritesStore>,
    pub reviews: Arc<dyn ReviewsStore>,
    pub preferences: Arc<dyn PreferencesStore>,
    pub error_logs: Arc<dyn ErrorLogStore>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: RecommendationService,
    pub catalog: CatalogService,
    pub favorites: FavoritesService,
    pub reviews: ReviewsService,
    pub preferences: PreferencesService,
    pub default_user_id: Uuid,
}

impl AppState {
    /// Wires the services over the given backends
    pub fn new(config: &Config, gateway: Arc<dyn ChatGateway>, stores: Stores) -> Self {
        let recommendations = RecommendationService::new(
            gateway,
            CatalogWriter::new(stores.games.clone()),
            ErrorLogger::new(stores.error_logs),
            config.recommendation_count,
        );

        Self {
            recommendations,
            catalog: CatalogService::new(stores.games.clone()),
            favorites: FavoritesService::new(stores.favorites, stores.games.clone()),
            reviews: ReviewsService::new(stores.reviews, stores.games.clone()),
            preferences: PreferencesService::new(stores.preferences, stores.games),
            default_user_id: config.default_user_id,
        }
    }
}

/// Creates the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes(state.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api, all acting on behalf of the current user
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/recommendations", post(recommendations::recommend))
        .route("/games", get(games::list_games))
        .route("/games/:id", get(games::get_game))
        .route("/game-types", get(games::list_game_types))
        .route(
            "/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/favorites/check", get(favorites::check_favorite))
        .route("/favorites/:game_id", delete(favorites::remove_favorite))
        .route("/reviews", post(reviews::add_review))
        .route("/reviews/:review_id", delete(reviews::remove_review))
        .route(
            "/preferences",
            get(preferences::get_preferences).put(preferences::update_preferences),
        )
        .layer(middleware::from_fn_with_state(state, current_user_middleware))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
