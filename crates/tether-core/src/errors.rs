use serde_json::Value;
use thiserror::Error;

/// Reasons a decoded device message is not a successful JSON-RPC reply.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplyError {
    /// `jsonrpc` member was missing or not `"2.0"`.
    #[error("parse error: invalid `jsonrpc` = {}", display_found(.found))]
    InvalidVersion { found: Option<Value> },
    /// Device answered with a JSON-RPC error object.
    #[error("error response: {error}")]
    ErrorResponse { error: Value },
    /// Reply carried neither an error nor a result.
    #[error("parse error: missing `result`")]
    MissingResult,
}

impl ReplyError {
    /// Numeric `code` of an error response, when the device supplied one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ReplyError::ErrorResponse { error } => error.get("code").and_then(Value::as_i64),
            _ => None,
        }
    }
}

fn display_found(found: &Option<Value>) -> String {
    match found {
        Some(value) => value.to_string(),
        None => "None".to_string(),
    }
}
