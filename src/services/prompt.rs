use serde_json::{json, Value};

use crate::{models::PreferenceInput, services::llm::ResponseFormat};

/// Fixed system message sent ahead of every recommendation prompt
pub const SYSTEM_MESSAGE: &str = "You are a board game expert. Your task is to recommend \
board games based on the description of the user's preferences.";

pub const RESPONSE_SCHEMA_NAME: &str = "gameRecommendations";

/// Builds the user prompt for a recommendation request
///
/// Constraint lines appear only for the preferences that are set.
pub fn build_prompt(input: &PreferenceInput, count: u32) -> String {
    let mut prompt = format!("I need {count} board game recommendations ");
    prompt.push_str("based on the following preferences:\n\n");
    prompt.push_str(&format!("Preference description: {}\n\n", input.description));

    if input.players > 0 {
        prompt.push_str(&format!("Number of players: {}\n", input.players));
    }
    if input.duration > 0 {
        prompt.push_str(&format!(
            "Play time of at most {} minutes\n",
            input.duration
        ));
    }
    if input.complexity > 0 {
        prompt.push_str(&format!("Complexity level: {}\n", input.complexity));
    }
    if !input.types.is_empty() {
        prompt.push_str(&format!("Preferred game types: {}\n", input.types.join(", ")));
    }

    prompt.push_str(&format!(
        "\nRespond in JSON with {count} different recommendations in an array. \
Each recommendation must contain:
1. title - the title of the game (string)
2. players - number of players (string in the format \"1-4\" or similar)
3. duration - play time in minutes (string, e.g. \"30-60\")
4. types - list of game types (array of strings)
5. complexity - complexity level on a 1-5 scale (integer)
6. description - a detailed description of the recommendation (string)
7. imageUrl - leave as an empty string (it is filled in later)

Return valid JSON matching this format, without explanations or additional text."
    ));

    prompt
}

/// JSON schema the model's reply must conform to
pub fn recommendation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "players": { "type": "string" },
                        "duration": { "type": "string" },
                        "types": {
                            "type": "array",
                            "items": { "type": "string" }
                        },
                        "complexity": { "type": "integer" },
                        "description": { "type": "string" },
                        "imageUrl": { "type": "string" }
                    },
                    "required": [
                        "title",
                        "players",
                        "duration",
                        "types",
                        "complexity",
                        "description",
                        "imageUrl"
                    ],
                    "additionalProperties": false
                }
            }
        },
        "required": ["recommendations"],
        "additionalProperties": false
    })
}

pub fn response_format() -> ResponseFormat {
    ResponseFormat::json_schema(RESPONSE_SCHEMA_NAME, recommendation_schema())
}
