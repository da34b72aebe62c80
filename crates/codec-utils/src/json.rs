use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;

/// Serializes `value` to a compact JSON string.
///
/// Object keys of a `serde_json::Value` are emitted in sorted order, so the
/// same structured value always produces the same string.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|e| CodecError::SerializationFailed(e.to_string()))
}

/// Parses a JSON string produced by [`serialize`] (or any JSON) into `T`.
pub fn deserialize<T: DeserializeOwned>(s: &str) -> Result<T, CodecError> {
    serde_json::from_str(s).map_err(|e| CodecError::DeserializationFailed(e.to_string()))
}

/// UTF-8 bytes of the [`serialize`]d form of `value`.
pub fn to_buffer<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    serialize(value).map(String::into_bytes)
}
