use thiserror::Error;

/// Hex and serialization helper errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    #[error("deserialization failed: {0}")]
    DeserializationFailed(String),
}
