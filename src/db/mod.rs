pub mod catalog;
pub mod error_log;
pub mod favorites;
pub mod postgres;
pub mod preferences;
pub mod reviews;

pub use catalog::{GameCatalog, PgGameCatalog};
pub use error_log::{ErrorLogStore, PgErrorLogStore};
pub use favorites::{FavoritesStore, PgFavoritesStore};
pub use postgres::{create_pool, run_migrations};
pub use preferences::{PgPreferencesStore, PreferencesStore};
pub use reviews::{PgReviewsStore, ReviewsStore};
