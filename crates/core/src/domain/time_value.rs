// Temporal input representations

use crate::domain::error::{DomainError, Result};
use serde_json::Value;

/// Instant as floating-point seconds since the Unix epoch (UTC)
pub type EpochSeconds = f64;

/// A point in time in one of the three accepted representations.
///
/// The variant decides the interpretation: integers are epoch
/// milliseconds, floats are epoch seconds, text is ISO-like.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    Millis(i64),
    Seconds(EpochSeconds),
    Text(String),
}

impl TimeValue {
    /// Convert a dynamic JSON value.
    ///
    /// Integers become `Millis`, floats `Seconds`, strings `Text`.
    /// Anything else (null, bool, array, object, integers beyond `i64`)
    /// is a `TypeKind` error for `operation`.
    pub fn from_json(value: &Value, operation: &'static str) -> Result<Self> {
        match value {
            Value::Number(n) if n.is_f64() => n
                .as_f64()
                .map(TimeValue::Seconds)
                .ok_or_else(|| type_kind(operation, value)),
            Value::Number(n) => n
                .as_i64()
                .map(TimeValue::Millis)
                .ok_or_else(|| type_kind(operation, value)),
            Value::String(s) => Ok(TimeValue::Text(s.clone())),
            other => Err(type_kind(operation, other)),
        }
    }

    /// Short name of the representation, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            TimeValue::Millis(_) => "integer milliseconds",
            TimeValue::Seconds(_) => "float seconds",
            TimeValue::Text(_) => "text",
        }
    }
}

fn type_kind(operation: &'static str, value: &Value) -> DomainError {
    let found = match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(n) => format!("out-of-range number {}", n),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    };
    DomainError::TypeKind { operation, found }
}

impl std::fmt::Display for TimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeValue::Millis(m) => write!(f, "{}", m),
            TimeValue::Seconds(s) => write!(f, "{:?}", s),
            TimeValue::Text(t) => f.write_str(t),
        }
    }
}

impl From<i64> for TimeValue {
    fn from(millis: i64) -> Self {
        TimeValue::Millis(millis)
    }
}

impl From<f64> for TimeValue {
    fn from(secs: f64) -> Self {
        TimeValue::Seconds(secs)
    }
}

impl From<&str> for TimeValue {
    fn from(text: &str) -> Self {
        TimeValue::Text(text.to_string())
    }
}

impl From<String> for TimeValue {
    fn from(text: String) -> Self {
        TimeValue::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_by_representation() {
        assert_eq!(
            TimeValue::from_json(&json!(1700000000000_i64), "op").unwrap(),
            TimeValue::Millis(1700000000000)
        );
        assert_eq!(
            TimeValue::from_json(&json!(1700000000.5), "op").unwrap(),
            TimeValue::Seconds(1700000000.5)
        );
        assert_eq!(
            TimeValue::from_json(&json!("2023-11-14T22:13:20Z"), "op").unwrap(),
            TimeValue::Text("2023-11-14T22:13:20Z".to_string())
        );
    }

    #[test]
    fn test_from_json_rejects_other_shapes() {
        for value in [json!(null), json!(true), json!([1, 2]), json!({"t": 1})] {
            let err = TimeValue::from_json(&value, "to_seconds").unwrap_err();
            assert!(matches!(
                err,
                DomainError::TypeKind {
                    operation: "to_seconds",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_from_json_u64_beyond_i64() {
        let err = TimeValue::from_json(&json!(u64::MAX), "to_seconds").unwrap_err();
        assert!(err.to_string().contains("out-of-range"));
    }

    #[test]
    fn test_display_keeps_float_marker() {
        assert_eq!(TimeValue::Seconds(5.0).to_string(), "5.0");
        assert_eq!(TimeValue::Millis(5).to_string(), "5");
    }
}
