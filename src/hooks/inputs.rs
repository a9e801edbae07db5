//! Input validation hook
//!
//! Checks kickoff inputs and returns a normalized copy.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::error::{CrewError, Result};

/// Kickoff inputs: field name to JSON value.
pub type Inputs = Map<String, Value>;

/// Field every kickoff must carry.
pub const TOPIC_FIELD: &str = "topic";

/// Field added with the instant the inputs were normalized.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Validates kickoff inputs and returns a normalized copy.
///
/// `None` passes through. Otherwise `topic` must be present and a string; the
/// copy carries `topic` trimmed and lower-cased plus a `timestamp` field in
/// RFC 3339. The caller's map is never touched.
pub fn validate_and_normalize_inputs(inputs: Option<&Inputs>) -> Result<Option<Inputs>> {
    let Some(inputs) = inputs else {
        return Ok(None);
    };

    let topic = match inputs.get(TOPIC_FIELD) {
        None => return Err(CrewError::MissingRequiredField(TOPIC_FIELD.to_string())),
        Some(Value::String(topic)) => topic.trim().to_lowercase(),
        Some(other) => {
            return Err(CrewError::InvalidField {
                field: TOPIC_FIELD.to_string(),
                reason: format!("expected a string, got {}", json_kind(other)),
            })
        }
    };

    let mut normalized = inputs.clone();
    normalized.insert(TOPIC_FIELD.to_string(), Value::String(topic));
    normalized.insert(
        TIMESTAMP_FIELD.to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    Ok(Some(normalized))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::parse_timestamp;
    use serde_json::json;

    fn inputs(value: Value) -> Inputs {
        match value {
            Value::Object(map) => map,
            _ => panic!("test inputs must be an object"),
        }
    }

    #[test]
    fn test_absent_inputs_pass_through() {
        assert_eq!(validate_and_normalize_inputs(None).unwrap(), None);
    }

    #[test]
    fn test_empty_inputs_missing_topic() {
        let err = validate_and_normalize_inputs(Some(&Inputs::new())).unwrap_err();
        assert!(matches!(err, CrewError::MissingRequiredField(field) if field == "topic"));
    }

    #[test]
    fn test_other_field_only_missing_topic() {
        let original = inputs(json!({"other": "x"}));
        let err = validate_and_normalize_inputs(Some(&original)).unwrap_err();

        assert!(matches!(err, CrewError::MissingRequiredField(_)));
        assert_eq!(original, inputs(json!({"other": "x"})));
    }

    #[test]
    fn test_topic_normalized_and_timestamp_added() {
        let original = inputs(json!({"topic": "  Foo Bar  ", "audience": "Engineers"}));

        let normalized = validate_and_normalize_inputs(Some(&original))
            .unwrap()
            .unwrap();

        assert_eq!(normalized["topic"], "foo bar");
        assert_eq!(normalized["audience"], "Engineers");
        let ts = normalized["timestamp"].as_str().unwrap();
        assert!(parse_timestamp(ts).is_some(), "timestamp should parse: {}", ts);

        assert_eq!(original["topic"], "  Foo Bar  ");
        assert!(!original.contains_key("timestamp"));
    }

    #[test]
    fn test_non_string_topic_rejected() {
        let original = inputs(json!({"topic": 42}));
        let err = validate_and_normalize_inputs(Some(&original)).unwrap_err();

        assert!(err.to_string().contains("expected a string, got a number"));
    }

    #[test]
    fn test_existing_timestamp_replaced() {
        let original = inputs(json!({"topic": "AI", "timestamp": "stale"}));
        let normalized = validate_and_normalize_inputs(Some(&original))
            .unwrap()
            .unwrap();

        assert_ne!(normalized["timestamp"], "stale");
    }
}
