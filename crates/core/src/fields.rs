//! Field list loading
//!
//! Turns the JSON handed to the filler into an ordered list of [`Anchor`]s.
//! Three shapes are accepted:
//!
//! ```json
//! {"fields": [{"anchor": "Full Name", "value": "Ana"}]}
//! {"Full Name": "Ana", "Date of birth": "1990-01-01"}
//! [{"Full Name": "Ana"}, {"anchor": "Date of birth", "value": "1990-01-01"}]
//! ```
//!
//! Object key order is preserved. Values of any JSON type are accepted and
//! rendered as text; `null` becomes an empty value.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::fill::Anchor;

#[derive(Debug, Error)]
pub enum FieldsError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "unsupported fields format: expected an object, {{\"fields\": [{{\"anchor\", \"value\"}}]}}, \
         or a list of single-entry objects [{{label: value}}, ...], got {0}"
    )]
    UnsupportedFormat(&'static str),
}

/// Parse a field list from JSON text.
pub fn parse_fields(json: &str) -> Result<Vec<Anchor>, FieldsError> {
    let value: Value = serde_json::from_str(json)?;
    fields_from_value(&value)
}

/// Interpret an already parsed JSON value as a field list.
pub fn fields_from_value(value: &Value) -> Result<Vec<Anchor>, FieldsError> {
    match value {
        Value::Object(map) => match map.get("fields") {
            Some(Value::Array(items)) => Ok(from_fields_list(items)),
            _ => Ok(from_flat_map(map)),
        },
        Value::Array(items) => Ok(from_list(items)),
        Value::String(_) => Err(FieldsError::UnsupportedFormat("a string")),
        Value::Number(_) => Err(FieldsError::UnsupportedFormat("a number")),
        Value::Bool(_) => Err(FieldsError::UnsupportedFormat("a boolean")),
        Value::Null => Err(FieldsError::UnsupportedFormat("null")),
    }
}

/// Render a JSON value as the text to write.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn from_fields_list(items: &[Value]) -> Vec<Anchor> {
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let label = item.get("anchor").map(value_text).unwrap_or_default();
            if label.is_empty() {
                return None;
            }
            let value = item.get("value").map(value_text).unwrap_or_default();
            Some(Anchor { label, value })
        })
        .collect()
}

fn from_flat_map(map: &Map<String, Value>) -> Vec<Anchor> {
    map.iter()
        .map(|(key, value)| Anchor {
            label: key.trim().to_string(),
            value: value_text(value),
        })
        .collect()
}

fn from_list(items: &[Value]) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    for item in items {
        let Some(object) = item.as_object().filter(|o| !o.is_empty()) else {
            continue;
        };

        if let (Some(anchor), Some(value)) = (object.get("anchor"), object.get("value")) {
            anchors.push(Anchor {
                label: value_text(anchor),
                value: value_text(value),
            });
            continue;
        }

        if object.len() == 1 {
            if let Some((key, value)) = object.iter().next() {
                anchors.push(Anchor {
                    label: key.trim().to_string(),
                    value: value_text(value),
                });
            }
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(anchors: &[Anchor]) -> Vec<(&str, &str)> {
        anchors
            .iter()
            .map(|a| (a.label.as_str(), a.value.as_str()))
            .collect()
    }

    #[test]
    fn test_flat_map_keeps_order() {
        let anchors = parse_fields(r#"{"Zeta": "1", "Alpha": " two ", "Mid": null}"#).unwrap();
        assert_eq!(
            pairs(&anchors),
            vec![("Zeta", "1"), ("Alpha", "two"), ("Mid", "")]
        );
    }

    #[test]
    fn test_fields_list() {
        let json = r#"{"fields": [
            {"anchor": " Full Name ", "value": "Ana"},
            "not an object",
            {"anchor": "", "value": "skipped"},
            {"anchor": "Age", "value": 34},
            {"anchor": "Notes"}
        ]}"#;
        let anchors = parse_fields(json).unwrap();
        assert_eq!(
            pairs(&anchors),
            vec![("Full Name", "Ana"), ("Age", "34"), ("Notes", "")]
        );
    }

    #[test]
    fn test_fields_key_that_is_not_a_list_is_flat_map() {
        let anchors = parse_fields(r#"{"fields": "Some label value"}"#).unwrap();
        assert_eq!(pairs(&anchors), vec![("fields", "Some label value")]);
    }

    #[test]
    fn test_list_of_singletons_and_pairs() {
        let json = r#"[
            {"Full Name": "Ana"},
            {"anchor": "Date of birth", "value": "1990-01-01"},
            {},
            42,
            {"a": "1", "b": "2"},
            {"Resident": true}
        ]"#;
        let anchors = parse_fields(json).unwrap();
        assert_eq!(
            pairs(&anchors),
            vec![
                ("Full Name", "Ana"),
                ("Date of birth", "1990-01-01"),
                ("Resident", "true"),
            ]
        );
    }

    #[test]
    fn test_unsupported_shapes() {
        for json in [r#""just text""#, "12", "true", "null"] {
            let err = parse_fields(json).unwrap_err();
            assert!(matches!(err, FieldsError::UnsupportedFormat(_)), "{json}");
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(parse_fields("{nope"), Err(FieldsError::Json(_))));
    }

    #[test]
    fn test_value_text_renders_structured_values() {
        let value: Value = serde_json::json!({"k": [1, 2]});
        assert_eq!(value_text(&value), r#"{"k":[1,2]}"#);
        assert_eq!(value_text(&serde_json::json!(2.5)), "2.5");
    }

    #[test]
    fn test_empty_inputs() {
        assert!(parse_fields("{}").unwrap().is_empty());
        assert!(parse_fields("[]").unwrap().is_empty());
        assert!(parse_fields(r#"{"fields": []}"#).unwrap().is_empty());
    }
}
