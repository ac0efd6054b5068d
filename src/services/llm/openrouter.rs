/// OpenRouter chat-completions gateway
///
/// API Flow:
/// 1. POST {api_url}/chat/completions with bearer auth and the app identity headers
/// 2. Non-2xx replies and transport errors are retried with exponential backoff
/// 3. The reply text is read from `choices[0].message.content`
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::Config,
    error::{AppResult, ErrorCode, RecommendationError},
    services::llm::{ChatGateway, ChatMessage, ChatOptions, ResponseFormat, RetryPolicy},
};

const DEFAULT_REFERER: &str = "https://boardmateai.com";
const DEFAULT_TITLE: &str = "BoardMate AI";

#[derive(Clone)]
pub struct OpenRouterGateway {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    system_message: String,
    referer: String,
    title: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'a ResponseFormat>,
    stream: bool,
    #[serde(flatten)]
    options: ChatOptions,
}

fn communication_error(message: impl Into<String>) -> RecommendationError {
    RecommendationError::new(ErrorCode::ApiCommunicationError, message)
}

impl OpenRouterGateway {
    /// Creates a gateway; fails with `OPENROUTER_API_KEY_MISSING` on a blank key
    pub fn new(
        api_key: &str,
        api_url: impl Into<String>,
        model: impl Into<String>,
    ) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(RecommendationError::new(
                ErrorCode::OpenrouterApiKeyMissing,
                "OpenRouter API key is required",
            )
            .into());
        }

        let mut gateway = Self {
            http_client: HttpClient::new(),
            api_key: api_key.to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            model: String::new(),
            system_message: String::new(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            retry: RetryPolicy::default(),
        };
        gateway.set_model(model)?;

        Ok(gateway)
    }

    /// Builds the gateway from application configuration
    pub fn from_config(config: &Config, system_message: &str) -> AppResult<Self> {
        let api_key = config.openrouter_api_key.as_deref().unwrap_or_default();
        let http_client = HttpClient::builder()
            .timeout(config.gateway_timeout())
            .build()?;

        let gateway = Self::new(
            api_key,
            config.openrouter_api_url.clone(),
            config.openrouter_model.clone(),
        )?
        .with_http_client(http_client)
        .with_system_message(system_message)
        .with_app_identity(config.app_referer.clone(), config.app_title.clone())
        .with_retry_policy(RetryPolicy {
            max_retries: config.openrouter_max_retries,
            base_delay: config.retry_delay(),
            max_delay: config.max_retry_delay(),
        });

        tracing::info!(
            model = %gateway.model,
            max_retries = gateway.retry.max_retries,
            "Initialized OpenRouter gateway"
        );

        Ok(gateway)
    }

    pub fn with_http_client(mut self, http_client: HttpClient) -> Self {
        self.http_client = http_client;
        self
    }

    /// Message prepended to every conversation; empty disables it
    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    /// Values for the `HTTP-Referer` and `X-Title` headers
    pub fn with_app_identity(
        mut self,
        referer: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        self.referer = referer.into();
        self.title = title.into();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Switches the model used for subsequent requests
    pub fn set_model(&mut self, model: impl Into<String>) -> AppResult<()> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(RecommendationError::new(
                ErrorCode::InvalidInput,
                "Model name cannot be empty",
            )
            .into());
        }

        tracing::debug!(model = %model, "OpenRouter model set");
        self.model = model;
        Ok(())
    }

    /// POSTs the request, retrying failed attempts per the retry policy
    async fn send_with_retry(&self, request: &ChatCompletionRequest<'_>) -> AppResult<Value> {
        let url = format!("{}/chat/completions", self.api_url);
        let attempts = self.retry.attempts();
        let mut last_error = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.retry.delay_with_jitter(attempt - 1);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying OpenRouter request"
                );
                tokio::time::sleep(delay).await;
            }

            let result = self
                .http_client
                .post(&url)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", &self.referer)
                .header("X-Title", &self.title)
                .json(request)
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(status = response.status().as_u16(), "OpenRouter replied");
                    return response.json::<Value>().await.map_err(|e| {
                        communication_error(format!("Invalid OpenRouter response body: {}", e))
                            .into()
                    });
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    tracing::warn!(
                        attempt = attempt + 1,
                        status = status.as_u16(),
                        "OpenRouter request failed"
                    );
                    last_error = format!("HTTP error {}: {}", status.as_u16(), body);
                }
                Err(e) => {
                    tracing::warn!(attempt = attempt + 1, error = %e, "OpenRouter transport error");
                    last_error = e.to_string();
                }
            }
        }

        Err(communication_error(format!(
            "Failed to get a response from OpenRouter after {} attempts: {}",
            attempts, last_error
        ))
        .into())
    }
}

#[async_trait::async_trait]
impl ChatGateway for OpenRouterGateway {
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        response_format: Option<ResponseFormat>,
        options: Option<ChatOptions>,
    ) -> AppResult<String> {
        if messages.is_empty() {
            return Err(RecommendationError::new(
                ErrorCode::InvalidInput,
                "At least one message is required",
            )
            .into());
        }

        let mut conversation = Vec::with_capacity(messages.len() + 1);
        if !self.system_message.is_empty() {
            conversation.push(ChatMessage::system(self.system_message.as_str()));
        }
        conversation.extend(messages);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: &conversation,
            response_format: response_format.as_ref(),
            stream: false,
            options: options.unwrap_or_default(),
        };

        tracing::info!(
            model = %self.model,
            message_count = conversation.len(),
            structured = response_format.is_some(),
            "Sending chat completion request"
        );

        let body = self.send_with_retry(&request).await?;

        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                communication_error(format!("Invalid OpenRouter response: {}", body)).into()
            })
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}
