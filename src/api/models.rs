use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A backend-defined schema naming a class of content objects.
///
/// Definition fields vary per deployment and are kept as delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub internal: bool,
    #[serde(flatten)]
    pub definition: Map<String, Value>,
}

/// An instance of a content type.
///
/// Content types are defined externally and unbounded, so everything beyond
/// the identifier is a dynamic field map rather than a fixed structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentObject {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One page of a content object listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub data: Vec<ContentObject>,
    /// Page number to request next, present only when the backend reports
    /// more pages after the current one.
    pub next_page: Option<u32>,
    pub total_pages: u32,
}

/// Listing envelope for content types.
#[derive(Debug, Deserialize)]
pub struct ContentTypeListResponse {
    #[serde(default)]
    pub data: Option<Vec<ContentType>>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Listing envelope for content objects.
#[derive(Debug, Deserialize)]
pub struct ObjectListResponse {
    #[serde(default)]
    pub data: Option<Vec<ContentObject>>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub current_page: u32,
}

/// Pre-encoded multipart payload for a media upload.
///
/// Encoding the form body is the caller's responsibility; the client sends
/// it opaquely with the given content type.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaPayload {
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
        }
    }
}

/// Build the backend's query-by-example expression for a single wildcard
/// substring match over all fields.
pub fn contains_filter(text: &str) -> String {
    let quoted = Value::String(text.to_string()).to_string();
    format!(r#"{{"*":{{"type":"contains","filter":{quoted}}}}}"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contains_filter_matches_wire_format() {
        assert_eq!(
            contains_filter("blog post"),
            r#"{"*":{"type":"contains","filter":"blog post"}}"#
        );
    }

    #[test]
    fn contains_filter_escapes_text() {
        assert_eq!(
            contains_filter(r#"say "hi""#),
            r#"{"*":{"type":"contains","filter":"say \"hi\""}}"#
        );
    }

    #[test]
    fn content_object_keeps_dynamic_fields() {
        let object: ContentObject = serde_json::from_value(json!({
            "id": "blogpost-1",
            "title": "First",
            "public": true,
            "tags": ["a", "b"],
        }))
        .unwrap();
        assert_eq!(object.id, "blogpost-1");
        assert_eq!(object.fields["title"], json!("First"));
        assert_eq!(object.fields["tags"], json!(["a", "b"]));
    }
}
