use codec_utils::CodecError;
use thiserror::Error;

/// Packed encoding errors.
///
/// Encoding stops at the first error; no partial output is returned.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("{ty} is not matching the given array: expected {expected} elements, got {actual}")]
    ArrayLengthMismatch {
        ty: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid bytes characters: {value}")]
    InvalidBytesLiteral { value: String },

    #[error("{value} is not a valid address, or the checksum is invalid")]
    InvalidAddress { value: String },

    #[error("invalid size {size} for type {ty}")]
    InvalidDeclaredSize { ty: String, size: usize },

    #[error("invalid bytes{size} value: {len} bytes do not fit")]
    BytesExceedSize { size: usize, len: usize },

    #[error("supplied integer exceeds width: {bits} bits > {width}")]
    ValueExceedsWidth { width: usize, bits: usize },

    #[error("supplied uint {value} is negative")]
    NegativeUnsigned { value: String },

    #[error("unsupported or invalid type: {ty}")]
    UnsupportedType { ty: String },

    #[error("{value} is not a number")]
    NotANumber { value: String },

    #[error("integer {value} does not fit in 1024 bits")]
    IntegerOverflow { value: String },

    #[error("type {ty} cannot encode value {value}")]
    TypeMismatch { ty: String, value: String },

    #[error(transparent)]
    Codec(#[from] CodecError),
}
