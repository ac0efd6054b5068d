use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game types a user prefers, by `game_types.id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPreferences {
    pub preferred_types: Vec<Uuid>,
}
