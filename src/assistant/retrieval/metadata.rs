//! Field probing over backend-specific candidate metadata.

use serde_json::{Map, Value};

/// Keys that may hold the passage text, in lookup order.
pub const TEXT_KEYS: [&str; 6] = [
    "text",
    "content",
    "chunk",
    "chunk_text",
    "page_content",
    "text_preview",
];

/// Keys that may hold the source document name, in lookup order.
pub const SOURCE_KEYS: [&str; 2] = ["source_document", "source"];

/// Keys that may hold the page identifier, in lookup order.
pub const PAGE_KEYS: [&str; 2] = ["page_number", "page"];

/// First non-blank string under a known text key.
#[must_use]
pub fn extract_text(metadata: &Map<String, Value>) -> Option<String> {
    TEXT_KEYS.iter().find_map(|key| match metadata.get(*key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    })
}

/// Source document name, when present.
#[must_use]
pub fn extract_source(metadata: &Map<String, Value>) -> Option<String> {
    SOURCE_KEYS
        .iter()
        .find_map(|key| metadata.get(*key).and_then(scalar_to_string))
}

/// Page identifier, when present. Integral numbers render without a fraction.
#[must_use]
pub fn extract_page(metadata: &Map<String, Value>) -> Option<String> {
    PAGE_KEYS
        .iter()
        .find_map(|key| metadata.get(*key).and_then(scalar_to_string))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => {
            if let Some(i) = number.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = number.as_u64() {
                Some(u.to_string())
            } else {
                number.as_f64().map(|f| {
                    if f.fract().abs() < f64::EPSILON && f.abs() < 1e15 {
                        format!("{f:.0}")
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_text_aliases_checked_in_order() {
        let metadata = map(json!({"chunk": "from chunk", "page_content": "from page"}));
        assert_eq!(extract_text(&metadata).as_deref(), Some("from chunk"));

        let blank_first = map(json!({"text": "   ", "text_preview": "preview"}));
        assert_eq!(extract_text(&blank_first).as_deref(), Some("preview"));
    }

    #[test]
    fn test_non_string_text_is_ignored() {
        let metadata = map(json!({"text": 42, "content": null}));
        assert!(extract_text(&metadata).is_none());
    }

    #[test]
    fn test_provenance_aliases() {
        let metadata = map(json!({"source": "guide.pdf", "page_number": 7.0}));
        assert_eq!(extract_source(&metadata).as_deref(), Some("guide.pdf"));
        assert_eq!(extract_page(&metadata).as_deref(), Some("7"));

        let preferred = map(json!({"source_document": "a.pdf", "source": "b.pdf", "page": "iv"}));
        assert_eq!(extract_source(&preferred).as_deref(), Some("a.pdf"));
        assert_eq!(extract_page(&preferred).as_deref(), Some("iv"));
    }

    #[test]
    fn test_fractional_page_kept() {
        let metadata = map(json!({"page": 3.5}));
        assert_eq!(extract_page(&metadata).as_deref(), Some("3.5"));
    }

    #[test]
    fn test_missing_provenance_is_none() {
        let metadata = map(json!({"text": "hello", "page": null}));
        assert!(extract_source(&metadata).is_none());
        assert!(extract_page(&metadata).is_none());
    }
}
