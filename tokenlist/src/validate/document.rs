//! Structural checks on a raw list document
use crate::error::{Violation, ViolationKind};
use serde_json::Value;

/// Parses `raw` and returns the `tokens` array. Fails with a `ParseError` when the content
/// isn't JSON, and a `SchemaError` when the root isn't an object or `tokens` isn't an array.
pub fn parse_tokens(raw: &str) -> Result<Vec<Value>, Violation> {
    let root: Value = serde_json::from_str(raw)
        .map_err(|e| Violation::new(ViolationKind::ParseError, format!("invalid JSON: {}", e)))?;

    let mut object = match root {
        Value::Object(map) => map,
        other => {
            return Err(Violation::new(
                ViolationKind::SchemaError,
                format!("document root must be an object, found {}", type_name(&other)),
            ))
        }
    };

    match object.remove("tokens") {
        Some(Value::Array(tokens)) => Ok(tokens),
        Some(other) => Err(Violation::new(
            ViolationKind::SchemaError,
            format!("\"tokens\" must be an array, found {}", type_name(&other)),
        )),
        None => Err(Violation::new(
            ViolationKind::SchemaError,
            "missing \"tokens\" array",
        )),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
