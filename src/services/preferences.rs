use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
    db::{GameCatalog, PreferencesStore},
    error::{AppError, AppResult},
    models::UserPreferences,
};

#[derive(Clone)]
pub struct PreferencesService {
    preferences: Arc<dyn PreferencesStore>,
    catalog: Arc<dyn GameCatalog>,
}

impl PreferencesService {
    pub fn new(preferences: Arc<dyn PreferencesStore>, catalog: Arc<dyn GameCatalog>) -> Self {
        Self {
            preferences,
            catalog,
        }
    }

    /// Users without saved preferences get an empty list
    pub async fn get(&self, user_id: Uuid) -> AppResult<UserPreferences> {
        Ok(self
            .preferences
            .get_preferences(user_id)
            .await?
            .unwrap_or_default())
    }

    /// Replaces the preferred game types; every id must name a known game type
    pub async fn update(
        &self,
        user_id: Uuid,
        preferred_types: Vec<Uuid>,
    ) -> AppResult<UserPreferences> {
        let mut seen = HashSet::new();
        let preferred_types: Vec<Uuid> = preferred_types
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        if !preferred_types.is_empty() {
            let known: HashSet<Uuid> = self
                .catalog
                .list_game_types()
                .await?
                .into_iter()
                .map(|t| t.id)
                .collect();

            let unknown: Vec<String> = preferred_types
                .iter()
                .filter(|id| !known.contains(id))
                .map(Uuid::to_string)
                .collect();
            if !unknown.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "Unknown game types: {}",
                    unknown.join(", ")
                )));
            }
        }

        let saved = self
            .preferences
            .save_preferences(user_id, &preferred_types)
            .await?;
        tracing::info!(
            user_id = %user_id,
            count = saved.preferred_types.len(),
            "Saved preferences"
        );

        Ok(saved)
    }
}
