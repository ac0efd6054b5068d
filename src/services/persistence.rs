use std::{collections::HashSet, sync::Arc};

use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::GameCatalog,
    models::{normalize_title, GameRef, NewBoardGame, RecommendationItem},
};

/// A recommendation that could not be turned into a catalog row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedGame {
    pub title: String,
    pub reason: String,
}

/// Outcome of a best-effort catalog write
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersistenceReport {
    pub inserted: Vec<GameRef>,
    pub skipped: Vec<SkippedGame>,
    /// Titles the catalog already had, including rows lost to a concurrent insert
    pub already_existing: usize,
    pub failed: usize,
}

/// Writes recommended games into the catalog
///
/// Persistence never fails the request: store errors are logged and counted.
#[derive(Clone)]
pub struct CatalogWriter {
    catalog: Arc<dyn GameCatalog>,
}

impl CatalogWriter {
    pub fn new(catalog: Arc<dyn GameCatalog>) -> Self {
        Self { catalog }
    }

    pub async fn persist(
        &self,
        items: &[RecommendationItem],
        created_by: Option<Uuid>,
    ) -> PersistenceReport {
        let mut report = PersistenceReport::default();

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for item in items {
            let key = normalize_title(&item.title);
            if key.is_empty() {
                report.skipped.push(SkippedGame {
                    title: item.title.clone(),
                    reason: "Missing title".to_string(),
                });
                continue;
            }
            if seen.insert(key) {
                candidates.push(item);
            }
        }

        if candidates.is_empty() {
            return report;
        }

        let titles: Vec<String> = candidates.iter().map(|item| item.title.clone()).collect();
        let existing: HashSet<String> = match self.catalog.existing_titles(&titles).await {
            Ok(existing) => existing.iter().map(|t| normalize_title(t)).collect(),
            Err(e) => {
                // The unique title index still rejects duplicates on insert
                tracing::warn!(error = %e, "Failed to look up existing titles");
                HashSet::new()
            }
        };

        let mut games = Vec::new();
        for item in candidates {
            if existing.contains(&normalize_title(&item.title)) {
                report.already_existing += 1;
                continue;
            }

            match to_new_game(item, created_by) {
                Ok(game) => games.push(game),
                Err(reason) => report.skipped.push(SkippedGame {
                    title: item.title.clone(),
                    reason,
                }),
            }
        }

        if !report.skipped.is_empty() {
            tracing::warn!(skipped = ?report.skipped, "Skipped invalid recommendations");
        }

        if games.is_empty() {
            return report;
        }

        match self.catalog.insert_games(&games).await {
            Ok(inserted) => report.inserted = inserted,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    game_count = games.len(),
                    "Batch insert failed, inserting games one by one"
                );
                self.insert_one_by_one(&games, &mut report).await;
            }
        }

        tracing::info!(
            inserted = report.inserted.len(),
            already_existing = report.already_existing,
            skipped = report.skipped.len(),
            failed = report.failed,
            "Persisted recommended games"
        );

        report
    }

    async fn insert_one_by_one(&self, games: &[NewBoardGame], report: &mut PersistenceReport) {
        for game in games {
            match self.catalog.insert_game(game).await {
                Ok(inserted) => report.inserted.push(inserted),
                Err(e) => match self.catalog.find_by_title(&game.title).await {
                    Ok(Some(_)) => report.already_existing += 1,
                    _ => {
                        tracing::error!(title = %game.title, error = %e, "Failed to insert game");
                        report.failed += 1;
                    }
                },
            }
        }
    }
}

/// Derives a catalog row from a recommendation
///
/// Players must be "min" or "min-max" with `0 < min <= max`, the first number of
/// the duration is used and must be positive, complexity must lie in 1..=5.
pub fn to_new_game(
    item: &RecommendationItem,
    created_by: Option<Uuid>,
) -> Result<NewBoardGame, String> {
    let (min_players, max_players) = parse_range(&item.players)
        .ok_or_else(|| format!("Invalid player count: {}", item.players))?;
    if min_players <= 0 {
        return Err(format!(
            "Minimum player count must be greater than 0, got: {}",
            item.players
        ));
    }
    if max_players < min_players {
        return Err(format!(
            "Maximum player count cannot be lower than the minimum, got: {}",
            item.players
        ));
    }

    let (duration, _) = parse_range(&item.duration)
        .ok_or_else(|| format!("Invalid play time format: {}", item.duration))?;
    if duration <= 0 {
        return Err(format!(
            "Play time must be greater than 0, got: {}",
            item.duration
        ));
    }

    if !(1..=5).contains(&item.complexity) {
        return Err(format!(
            "Complexity must be between 1 and 5, got: {}",
            item.complexity
        ));
    }

    Ok(NewBoardGame {
        title: item.title.trim().to_string(),
        description: item.description.clone(),
        min_players,
        max_players,
        duration,
        complexity: i32::from(item.complexity),
        types: item.types.clone(),
        created_by,
    })
}

/// Parses "n" or "n-m"; a single number yields `(n, n)`
fn parse_range(value: &str) -> Option<(i32, i32)> {
    let value = value.trim();
    match value.split_once('-') {
        Some((low, high)) => Some((low.trim().parse().ok()?, high.trim().parse().ok()?)),
        None => {
            let n = value.parse().ok()?;
            Some((n, n))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::catalog::MockGameCatalog, error::AppError};

    fn item(title: &str, players: &str, duration: &str) -> RecommendationItem {
        RecommendationItem {
            title: title.to_string(),
            players: players.to_string(),
            duration: duration.to_string(),
            complexity: 2,
            types: vec!["strategy".to_string()],
            description: format!("{title} description"),
            image_url: String::new(),
        }
    }

    fn game_ref(title: &str) -> GameRef {
        GameRef {
            id: Uuid::new_v4(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_to_new_game_parses_ranges() {
        let game = to_new_game(&item("Catan", "3-4", "60-90"), None).unwrap();
        assert_eq!((game.min_players, game.max_players), (3, 4));
        assert_eq!(game.duration, 60);
        assert_eq!(game.complexity, 2);

        let game = to_new_game(&item("Solo", "1", "20"), None).unwrap();
        assert_eq!((game.min_players, game.max_players), (1, 1));
    }

    #[test]
    fn test_to_new_game_rejects_invalid_rows() {
        assert!(to_new_game(&item("A", "0-4", "60"), None).is_err());
        assert!(to_new_game(&item("B", "5-2", "60"), None).is_err());
        assert!(to_new_game(&item("C", "2-4", "0"), None).is_err());
        assert!(to_new_game(&item("D", "many", "60"), None).is_err());

        let mut too_complex = item("E", "2-4", "60");
        too_complex.complexity = 7;
        assert!(to_new_game(&too_complex, None).is_err());
    }

    #[tokio::test]
    async fn test_persist_skips_existing_and_duplicate_titles() {
        let mut catalog = MockGameCatalog::new();
        catalog
            .expect_existing_titles()
            .withf(|titles| titles.len() == 2)
            .times(1)
            .returning(|_| Ok(vec!["CATAN".to_string()]));
        catalog
            .expect_insert_games()
            .withf(|games| games.len() == 1 && games[0].title == "Azul")
            .times(1)
            .returning(|games: &[NewBoardGame]| {
                Ok(games.iter().map(|g| game_ref(&g.title)).collect())
            });

        let writer = CatalogWriter::new(Arc::new(catalog));
        let report = writer
            .persist(
                &[
                    item("Catan", "3-4", "60"),
                    item("Azul", "2-4", "30-45"),
                    item(" azul ", "2-4", "30"),
                ],
                Some(Uuid::nil()),
            )
            .await;

        assert_eq!(report.inserted.len(), 1);
        assert_eq!(report.already_existing, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn test_persist_records_invalid_items() {
        let mut catalog = MockGameCatalog::new();
        catalog
            .expect_existing_titles()
            .returning(|_| Ok(Vec::new()));
        catalog.expect_insert_games().never();

        let writer = CatalogWriter::new(Arc::new(catalog));
        let report = writer
            .persist(&[item("Broken", "6-2", "60"), item("", "2-4", "60")], None)
            .await;

        assert!(report.inserted.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(report.skipped.iter().any(|s| s.title == "Broken"));
    }

    #[tokio::test]
    async fn test_batch_failure_falls_back_to_single_inserts() {
        let mut catalog = MockGameCatalog::new();
        catalog
            .expect_existing_titles()
            .returning(|_| Ok(Vec::new()));
        catalog
            .expect_insert_games()
            .times(1)
            .returning(|_| Err(AppError::Internal("batch rejected".to_string())));
        catalog
            .expect_insert_game()
            .times(3)
            .returning(|game: &NewBoardGame| match game.title.as_str() {
                "Raced" | "Broken" => Err(AppError::Internal("row rejected".to_string())),
                title => Ok(game_ref(title)),
            });
        catalog
            .expect_find_by_title()
            .times(2)
            .returning(|title: &str| {
                Ok((title == "Raced").then(|| game_ref(title)))
            });

        let writer = CatalogWriter::new(Arc::new(catalog));
        let report = writer
            .persist(
                &[
                    item("Fine", "2-4", "60"),
                    item("Raced", "2-4", "60"),
                    item("Broken", "2-4", "60"),
                ],
                None,
            )
            .await;

        assert_eq!(report.inserted.len(), 1);
        assert_eq!(report.inserted[0].title, "Fine");
        assert_eq!(report.already_existing, 1);
        assert_eq!(report.failed, 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_stop_persistence() {
        let mut catalog = MockGameCatalog::new();
        catalog
            .expect_existing_titles()
            .returning(|_| Err(AppError::Internal("db down".to_string())));
        catalog
            .expect_insert_games()
            .returning(|games: &[NewBoardGame]| {
                Ok(games.iter().map(|g| game_ref(&g.title)).collect())
            });

        let writer = CatalogWriter::new(Arc::new(catalog));
        let report = writer.persist(&[item("Azul", "2-4", "30")], None).await;
        assert_eq!(report.inserted.len(), 1);
    }
}
