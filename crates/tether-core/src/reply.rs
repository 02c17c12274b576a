use serde_json::Value;

use crate::{JSONRPC_VERSION, ReplyError};

/// Interprets a decoded device message as a JSON-RPC reply.
///
/// Returns the `result` member on success. The transport never calls this;
/// it is opt-in for callers that want envelope validation. A `null` error
/// is treated as absent and a `null` result as missing.
pub fn classify_reply(message: &Value) -> Result<Value, ReplyError> {
    let version = message.get("jsonrpc");
    if version.and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(ReplyError::InvalidVersion {
            found: version.cloned(),
        });
    }

    if let Some(error) = message.get("error").filter(|error| !error.is_null()) {
        return Err(ReplyError::ErrorResponse {
            error: error.clone(),
        });
    }

    match message.get("result") {
        Some(result) if !result.is_null() => Ok(result.clone()),
        _ => Err(ReplyError::MissingResult),
    }
}
