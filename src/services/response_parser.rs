use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Value};

use crate::{
    error::{ErrorCode, RecommendationError},
    models::{recommendation::DEFAULT_COMPLEXITY, RecommendationItem},
};

/// Greedy outermost `{ ... }` span, for replies that wrap JSON in prose
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(-\d+)?$").expect("valid regex"));

pub const FALLBACK_PLAYERS: &str = "2-4";
pub const FALLBACK_DURATION: &str = "60";

/// Longest slice of the raw reply echoed back in error details
const MAX_ECHOED_RESPONSE_CHARS: usize = 2000;

/// Turns the model's raw reply into normalized recommendation items
///
/// Returns `JSON_PARSE_ERROR` when no JSON object can be decoded and
/// `AI_RESPONSE_PARSE_ERROR` when the object lacks a non-empty
/// `recommendations` array. Every element of the array yields one item.
pub fn parse_recommendations(raw: &str) -> Result<Vec<RecommendationItem>, RecommendationError> {
    let value = decode_json(raw)?;

    let items = value
        .get("recommendations")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| {
            RecommendationError::new(
                ErrorCode::AiResponseParseError,
                "The model response does not contain a list of recommendations",
            )
            .with_details(json!({ "response": echoed(raw) }))
        })?;

    Ok(items.iter().map(coerce_item).collect())
}

fn decode_json(raw: &str) -> Result<Value, RecommendationError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        return Ok(value);
    }

    tracing::debug!("Reply is not plain JSON, extracting embedded object");

    JSON_OBJECT_RE
        .find(raw)
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .ok_or_else(|| {
            RecommendationError::new(
                ErrorCode::JsonParseError,
                "Could not find valid JSON in the model response",
            )
            .with_details(json!({ "response": echoed(raw) }))
        })
}

fn echoed(raw: &str) -> String {
    raw.chars().take(MAX_ECHOED_RESPONSE_CHARS).collect()
}

fn coerce_item(value: &Value) -> RecommendationItem {
    let image_url = value
        .get("imageUrl")
        .or_else(|| value.get("image_url"));

    RecommendationItem {
        title: text(value.get("title")),
        players: range_or(text(value.get("players")), FALLBACK_PLAYERS),
        duration: range_or(text(value.get("duration")), FALLBACK_DURATION),
        complexity: complexity(value.get("complexity")),
        types: types(value.get("types")),
        description: text(value.get("description")),
        image_url: text(image_url),
    }
}

/// Stringifies scalars; missing and null become empty
fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

fn range_or(value: String, fallback: &str) -> String {
    if RANGE_RE.is_match(&value) {
        value
    } else {
        fallback.to_string()
    }
}

fn complexity(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => n.round().clamp(1.0, 5.0) as u8,
        _ => DEFAULT_COMPLEXITY,
    }
}

/// Arrays are stringified element-wise, a lone scalar is wrapped; blanks are dropped
fn types(value: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(|item| text(Some(item))).collect(),
        Some(other) => vec![text(Some(other))],
    };

    items.into_iter().filter(|item| !item.is_empty()).collect()
}
