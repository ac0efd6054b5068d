pub mod error_log;
pub mod favorite;
pub mod game;
pub mod preferences;
pub mod recommendation;
pub mod review;

pub use error_log::{hash_description, ErrorLogEntry};
pub use favorite::{FavoriteGame, FavoriteSort, FavoritesQuery, Page};
pub use game::{
    normalize_title, BoardGame, BoardGameList, GameQuery, GameRef, GameSortField, GameType,
    NewBoardGame, Pagination, SortOrder,
};
pub use preferences::UserPreferences;
pub use recommendation::{PreferenceInput, RecommendationItem, RecommendationsResponse};
pub use review::{PostedReview, Review};
