use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Message used when an error payload carries nothing recognizable.
pub const DEFAULT_ERROR_MESSAGE: &str = "Unknown API error";

/// Extract the best available human-readable message from an error payload.
///
/// The backend's error bodies are not strictly typed: depending on the
/// endpoint the message may sit under `message`, `error`, or a per-field
/// `errors` map/array. Falls back to [`DEFAULT_ERROR_MESSAGE`].
pub fn parse_response_message(body: &Value) -> String {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(message) = body.get("error").and_then(Value::as_str) {
        return message.to_string();
    }
    if let Some(errors) = body.get("errors") {
        if let Some(message) = first_string(errors) {
            return message;
        }
    }
    DEFAULT_ERROR_MESSAGE.to_string()
}

/// Depth-first scan for the first string inside a map/array error shape.
fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_string),
        Value::Object(map) => map.values().find_map(first_string),
        _ => None,
    }
}

/// Decide whether an extracted message indicates a rejected credential.
///
/// Returns `false` when the message reads as a token problem. The backend
/// does not distinguish token errors by status code alone, so this stays a
/// string heuristic over its known phrasings.
pub fn is_api_token_valid(message: &str) -> bool {
    static TOKEN_REJECTED: OnceLock<Regex> = OnceLock::new();
    let pattern = TOKEN_REJECTED.get_or_init(|| {
        Regex::new(
            r"(?i)(token|api key)\b.*\b(invalid|expired|missing)|(invalid|expired|missing)\b.*\b(token|api key)",
        )
        .expect("token rejection pattern is valid")
    });
    !pattern.is_match(message)
}
