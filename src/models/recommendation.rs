use serde::{Deserialize, Serialize};

pub const MIN_DESCRIPTION_CHARS: u64 = 200;
pub const MAX_DESCRIPTION_CHARS: u64 = 10_000;

pub const DEFAULT_PLAYERS: u32 = 4;
pub const DEFAULT_DURATION: u32 = 60;
pub const DEFAULT_COMPLEXITY: u8 = 3;
pub const DEFAULT_GAME_TYPE: &str = "strategy";

/// Validated user preferences driving a single recommendation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceInput {
    pub description: String,
    pub players: u32,
    /// Maximum play time in minutes
    pub duration: u32,
    pub complexity: u8,
    pub types: Vec<String>,
}

/// One suggested board game, normalized by the response parser
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub title: String,
    /// Player count range such as "2-4"
    pub players: String,
    /// Play time in minutes, either "60" or "30-60"
    pub duration: String,
    pub complexity: u8,
    pub types: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_item_uses_camel_case_image_url() {
        let item = RecommendationItem {
            title: "Catan".to_string(),
            players: "3-4".to_string(),
            duration: "60-90".to_string(),
            complexity: 2,
            types: vec!["strategy".to_string()],
            description: "Trade and build".to_string(),
            image_url: String::new(),
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["imageUrl"], "");
        assert!(json.get("image_url").is_none());
    }
}
