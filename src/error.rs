use std::fmt::Display;

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Stable error codes surfaced to API clients and written to the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidDescription,
    DescriptionTooShort,
    DescriptionTooLong,
    InvalidPlayersCount,
    InvalidDuration,
    InvalidComplexity,
    InvalidTypes,
    InvalidInput,
    OpenrouterApiKeyMissing,
    ApiCommunicationError,
    AiResponseParseError,
    JsonParseError,
    UnexpectedError,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidDescription => "INVALID_DESCRIPTION",
            ErrorCode::DescriptionTooShort => "DESCRIPTION_TOO_SHORT",
            ErrorCode::DescriptionTooLong => "DESCRIPTION_TOO_LONG",
            ErrorCode::InvalidPlayersCount => "INVALID_PLAYERS_COUNT",
            ErrorCode::InvalidDuration => "INVALID_DURATION",
            ErrorCode::InvalidComplexity => "INVALID_COMPLEXITY",
            ErrorCode::InvalidTypes => "INVALID_TYPES",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::OpenrouterApiKeyMissing => "OPENROUTER_API_KEY_MISSING",
            ErrorCode::ApiCommunicationError => "API_COMMUNICATION_ERROR",
            ErrorCode::AiResponseParseError => "AI_RESPONSE_PARSE_ERROR",
            ErrorCode::JsonParseError => "JSON_PARSE_ERROR",
            ErrorCode::UnexpectedError => "UNEXPECTED_ERROR",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Codes caused by the caller's input rather than by the pipeline
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidDescription
                | ErrorCode::DescriptionTooShort
                | ErrorCode::DescriptionTooLong
                | ErrorCode::InvalidPlayersCount
                | ErrorCode::InvalidDuration
                | ErrorCode::InvalidComplexity
                | ErrorCode::InvalidTypes
                | ErrorCode::InvalidInput
        )
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure raised anywhere in the recommendation pipeline
#[derive(thiserror::Error, Debug, Clone)]
#[error("{code}: {message}")]
pub struct RecommendationError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
}

impl RecommendationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Recommendation(#[from] RecommendationError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Error code reported in the response body
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Recommendation(e) => e.code,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            _ => ErrorCode::UnknownError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Recommendation(e) => {
                let (status, error) = if e.code.is_input_error() {
                    (StatusCode::BAD_REQUEST, "Invalid input")
                } else {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to generate recommendations",
                    )
                };
                let mut body = json!({
                    "error": error,
                    "message": e.message,
                    "code": e.code,
                });
                if let Some(details) = e.details {
                    body["details"] = details;
                }
                (status, body)
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "code": ErrorCode::InvalidInput }),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::Database(_) | AppError::HttpClient(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Internal server error",
                        "message": self.to_string(),
                        "code": ErrorCode::UnknownError,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

// Extractor rejections keep the JSON error body instead of axum's plain text

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorCode::OpenrouterApiKeyMissing).unwrap();
        assert_eq!(json, "\"OPENROUTER_API_KEY_MISSING\"");
        assert_eq!(
            ErrorCode::AiResponseParseError.as_str(),
            "AI_RESPONSE_PARSE_ERROR"
        );
    }

    #[test]
    fn test_input_codes() {
        assert!(ErrorCode::DescriptionTooShort.is_input_error());
        assert!(ErrorCode::InvalidComplexity.is_input_error());
        assert!(!ErrorCode::ApiCommunicationError.is_input_error());
        assert!(!ErrorCode::JsonParseError.is_input_error());
    }

    #[tokio::test]
    async fn test_input_recommendation_error_is_bad_request() {
        let err = AppError::from(
            RecommendationError::new(ErrorCode::DescriptionTooShort, "too short")
                .with_details(json!({ "length": 12 })),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "DESCRIPTION_TOO_SHORT");
        assert_eq!(body["details"]["length"], 12);
    }

    #[tokio::test]
    async fn test_pipeline_error_is_internal() {
        let err = AppError::from(RecommendationError::new(
            ErrorCode::ApiCommunicationError,
            "gateway down",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "API_COMMUNICATION_ERROR");
        assert_eq!(body["message"], "gateway down");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_conflict_and_not_found_statuses() {
        let response = AppError::Conflict("dup".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::NotFound("game".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::Forbidden("not yours".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "not yours");
    }
}
