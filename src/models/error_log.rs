use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::Validate;

pub const MAX_ERROR_MESSAGE_CHARS: usize = 1000;

/// Audit record of a failed recommendation request
///
/// The description itself is never stored, only its SHA-256 digest and length.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct ErrorLogEntry {
    #[validate(length(min = 1, max = 50))]
    pub error_code: String,
    #[validate(length(max = 1000))]
    pub error_message: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(length(equal = 64))]
    pub description_hash: String,
    #[validate(range(min = 1))]
    pub description_length: i32,
    pub user_id: Uuid,
}

impl ErrorLogEntry {
    pub fn new(
        error_code: &str,
        error_message: &str,
        model: &str,
        description: &str,
        user_id: Uuid,
    ) -> Self {
        Self {
            error_code: error_code.to_string(),
            error_message: error_message.chars().take(MAX_ERROR_MESSAGE_CHARS).collect(),
            model: model.to_string(),
            description_hash: hash_description(description),
            description_length: i32::try_from(description.chars().count()).unwrap_or(i32::MAX),
            user_id,
        }
    }
}

/// Lowercase hex SHA-256 of the description
pub fn hash_description(description: &str) -> String {
    Sha256::digest(description.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_description_known_vector() {
        assert_eq!(
            hash_description("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_entry_counts_characters_not_bytes() {
        let entry = ErrorLogEntry::new(
            "API_COMMUNICATION_ERROR",
            "boom",
            "openai/gpt-4o-mini",
            "gra planszowa żółć",
            Uuid::nil(),
        );
        assert_eq!(entry.description_length, 18);
        assert_eq!(entry.description_hash.len(), 64);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let message = "x".repeat(5000);
        let entry = ErrorLogEntry::new("UNEXPECTED_ERROR", &message, "m", "d", Uuid::nil());
        assert_eq!(entry.error_message.chars().count(), MAX_ERROR_MESSAGE_CHARS);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_empty_description_fails_validation() {
        let entry = ErrorLogEntry::new("UNEXPECTED_ERROR", "boom", "m", "", Uuid::nil());
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_overlong_model_fails_validation() {
        let entry = ErrorLogEntry::new(
            "UNEXPECTED_ERROR",
            "boom",
            &"m".repeat(51),
            "description",
            Uuid::nil(),
        );
        let errors = entry.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("model"));
    }
}
