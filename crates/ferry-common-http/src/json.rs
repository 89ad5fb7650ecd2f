//! JSON encoding for request bodies.

use crate::error::HttpError;
use serde::Serialize;

/// Serialize `value` as one JSON document followed by a newline.
///
/// `<`, `>` and `&` are written as-is, never as `\u003c`-style escapes.
pub fn to_json_vec<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HttpError> {
    let mut out = serde_json::to_vec(value)?;
    out.push(b'\n');
    Ok(out)
}
