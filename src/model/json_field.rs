use serde_json::Value;

use crate::error::{Error, Result};

pub const NOT_JSON: &str = "Request body is not valid JSON.";

/// Parses a request body that must be a JSON document, without constraining its shape.
pub fn parse_body(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|_| Error::invalid_input(NOT_JSON))
}

/// The value of `field` when it is a non-empty string.
pub fn non_empty_string<'a>(body: &'a Value, field: &str) -> Option<&'a str> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
