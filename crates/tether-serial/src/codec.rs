use serde::Serialize;
use serde_json::{Deserializer, Value};

use crate::TransportError;

/// Serializes a value to one newline-terminated JSON line.
pub fn encode_line<T: Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    let mut line =
        serde_json::to_vec(value).map_err(|err| TransportError::Encode(err.to_string()))?;
    line.push(b'\n');
    Ok(line)
}

/// Decodes the first complete JSON document at the start of `bytes`.
///
/// Returns the value and the number of bytes it occupied, or `None` while
/// the buffer is incomplete or does not (yet) start with valid JSON.
pub fn decode_prefix(bytes: &[u8]) -> Option<(Value, usize)> {
    let mut documents = Deserializer::from_slice(bytes).into_iter::<Value>();
    match documents.next() {
        Some(Ok(value)) => Some((value, documents.byte_offset())),
        Some(Err(_)) | None => None,
    }
}

/// Counts bytes after a decoded document that are not line padding.
pub fn trailing_len(rest: &[u8]) -> usize {
    rest.trim_ascii().len()
}
