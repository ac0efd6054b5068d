pub mod catalog;
pub mod error_log;
pub mod favorites;
pub mod llm;
pub mod persistence;
pub mod preferences;
pub mod prompt;
pub mod recommendations;
pub mod response_parser;
pub mod reviews;

pub use catalog::CatalogService;
pub use error_log::ErrorLogger;
pub use favorites::FavoritesService;
pub use llm::{ChatGateway, FixtureGateway, OpenRouterGateway};
pub use persistence::{CatalogWriter, PersistenceReport};
pub use preferences::PreferencesService;
pub use recommendations::RecommendationService;
pub use reviews::ReviewsService;
