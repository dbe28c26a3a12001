//! Tool argument validation.
//!
//! Tool arguments arrive as an untyped JSON object. Required arguments follow
//! the MCP clients' loose conventions: a key that is absent, `null`, `false`,
//! `0` or `""` counts as missing.

use serde_json::Value;
use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(String),

    #[error("Invalid value for '{name}': {reason}")]
    Invalid { name: String, reason: String },

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Fail with `"<name> is required"` for the first missing argument
pub fn validate_required(args: &Value, required: &[&str]) -> Result<(), ValidationError> {
    for name in required {
        match args.get(name) {
            Some(value) if !is_blank(value) => {}
            _ => return Err(ValidationError::Missing(name.to_string())),
        }
    }
    Ok(())
}

/// A required argument as a string; numbers are accepted and stringified
pub fn required_str(args: &Value, name: &str) -> Result<String, ValidationError> {
    validate_required(args, &[name])?;
    match args.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(ValidationError::Invalid {
            name: name.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

/// An optional string argument
pub fn optional_str(args: &Value, name: &str, default: &str) -> String {
    args.get(name)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

/// An optional boolean argument
pub fn optional_bool(args: &Value, name: &str, default: bool) -> bool {
    args.get(name).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// An optional non-negative integer argument.
///
/// Clients often send numbers as floats (`20.0`); those are truncated.
/// Negative values are rejected.
pub fn optional_usize(args: &Value, name: &str, default: usize) -> Result<usize, ValidationError> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => {
            if let Some(n) = value.as_u64() {
                return Ok(n as usize);
            }
            match value.as_f64() {
                Some(f) if f >= 0.0 && f.is_finite() => Ok(f as usize),
                _ => Err(ValidationError::Invalid {
                    name: name.to_string(),
                    reason: format!("expected a non-negative number, got {}", value),
                }),
            }
        }
    }
}

/// Validate an absolute URL before handing it to an external service
pub fn validate_url(raw: &str) -> Result<url::Url, ValidationError> {
    url::Url::parse(raw).map_err(|_| ValidationError::InvalidUrl(raw.to_string()))
}
