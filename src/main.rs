use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use boardmate_api::{
    config::Config,
    db::{
        create_pool, run_migrations, PgErrorLogStore, PgFavoritesStore, PgGameCatalog,
        PgPreferencesStore, PgReviewsStore,
    },
    routes::{create_router, AppState, Stores},
    services::{prompt::SYSTEM_MESSAGE, ChatGateway, FixtureGateway, OpenRouterGateway},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardmate_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    if config.run_migrations {
        run_migrations(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let gateway: Arc<dyn ChatGateway> = if config.use_test_mode {
        tracing::warn!("Test mode enabled, serving canned recommendations");
        Arc::new(FixtureGateway::new())
    } else {
        Arc::new(OpenRouterGateway::from_config(&config, SYSTEM_MESSAGE)?)
    };

    let stores = Stores {
        games: Arc::new(PgGameCatalog::new(pool.clone())),
        favorites: Arc::new(PgFavoritesStore::new(pool.clone())),
        reviews: Arc::new(PgReviewsStore::new(pool.clone())),
        preferences: Arc::new(PgPreferencesStore::new(pool.clone())),
        error_logs: Arc::new(PgErrorLogStore::new(pool)),
    };
    let state = AppState::new(&config, gateway, stores);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
