use serde_json::json;

use crate::{
    error::{AppResult, ErrorCode, RecommendationError},
    services::llm::{ChatGateway, ChatMessage, ChatOptions, ResponseFormat},
};

const FIXTURE_MODEL: &str = "test-mode";

/// Offline gateway returning a fixed two-game reply
///
/// Enabled with `USE_TEST_MODE=true` for local development without an API key.
#[derive(Debug, Clone, Default)]
pub struct FixtureGateway;

impl FixtureGateway {
    pub fn new() -> Self {
        Self
    }

    fn reply() -> String {
        json!({
            "recommendations": [
                {
                    "title": "Test Game 1",
                    "players": "2-4",
                    "duration": "30-60",
                    "types": ["strategy", "family"],
                    "complexity": 2,
                    "description": "Sample test game number 1",
                    "imageUrl": ""
                },
                {
                    "title": "Test Game 2",
                    "players": "1-5",
                    "duration": "45-90",
                    "types": ["adventure", "cooperative"],
                    "complexity": 3,
                    "description": "Sample test game number 2",
                    "imageUrl": ""
                }
            ]
        })
        .to_string()
    }
}

#[async_trait::async_trait]
impl ChatGateway for FixtureGateway {
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        _response_format: Option<ResponseFormat>,
        _options: Option<ChatOptions>,
    ) -> AppResult<String> {
        if messages.is_empty() {
            return Err(RecommendationError::new(
                ErrorCode::InvalidInput,
                "At least one message is required",
            )
            .into());
        }

        tracing::info!("Serving canned recommendations (test mode)");
        Ok(Self::reply())
    }

    fn model(&self) -> String {
        FIXTURE_MODEL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_reply_is_valid_json() {
        let gateway = FixtureGateway::new();
        let reply = gateway
            .generate(vec![ChatMessage::user("anything")], None, None)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["recommendations"].as_array().unwrap().len(), 2);
        assert_eq!(gateway.model(), "test-mode");
    }
}
