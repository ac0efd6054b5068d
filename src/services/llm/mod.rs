/// Chat-completion gateway abstraction
///
/// The recommendation pipeline only needs "send these messages, get the reply
/// text back". The HTTP implementation talks to an OpenRouter-compatible
/// endpoint; the fixture implementation serves canned replies in test mode.
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;

pub mod fixture;
pub mod openrouter;

pub use fixture::FixtureGateway;
pub use openrouter::OpenRouterGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// `response_format` payload constraining the model to a JSON schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub json_schema: JsonSchemaFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSchemaFormat {
    pub name: String,
    pub strict: bool,
    pub schema: Value,
}

impl ResponseFormat {
    /// Strict JSON schema response format
    pub fn json_schema(name: impl Into<String>, schema: Value) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaFormat {
                name: name.into(),
                strict: true,
                schema,
            },
        }
    }
}

/// Optional sampling parameters, merged into the request body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Trait for chat-completion backends
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    /// Sends the conversation and returns the text of the first choice
    ///
    /// Failures are reported as `AppError::Recommendation` carrying
    /// `INVALID_INPUT` or `API_COMMUNICATION_ERROR`.
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        response_format: Option<ResponseFormat>,
        options: Option<ChatOptions>,
    ) -> AppResult<String>;

    /// Model name used for requests and audit records
    fn model(&self) -> String;
}

/// Exponential backoff with jitter between gateway attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(8000),
        }
    }
}

impl RetryPolicy {
    /// Total number of attempts, first one included
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (0-based), without jitter
    ///
    /// `base_delay * 2^retry`, clamped to `max_delay`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff plus a random jitter of up to half the delay
    pub fn delay_with_jitter(&self, retry: u32) -> Duration {
        let delay = self.backoff(retry);
        let max_jitter_ms = u64::try_from(delay.as_millis() / 2).unwrap_or(u64::MAX);
        if max_jitter_ms == 0 {
            return delay;
        }

        let jitter_ms = rand::thread_rng().gen_range(0..=max_jitter_ms);
        delay + Duration::from_millis(jitter_ms)
    }
}
