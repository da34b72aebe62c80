//! Non-standard packed encoding.
//!
//! Each entry is a type name plus a value. Values are concatenated with no
//! 32-byte alignment and no length prefixes:
//!
//! - `uintN` / `intN` take exactly `N / 8` bytes, big-endian. Negative
//!   `intN` values are two's complement.
//! - `bytesN` takes `N` bytes, left-aligned and zero-filled on the right.
//! - `address` takes 20 bytes, `bool` one byte.
//! - `bytes` and `string` are copied in place.
//!
//! Inside an array, `address` and `bytesN` elements widen to a full 32-byte
//! word. Other element types keep their scalar width.

use codec_utils::hex::{
    bytes_to_hex, has_hex_prefix, hex_to_bytes, is_hex_digits, strip_hex_prefix, utf8_to_hex,
};
use codec_utils::pad::{left_pad, right_pad};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::address::normalize_address;
use crate::error::PackError;
use crate::types::{ElementaryType, TypeDescriptor};
use crate::value::{coerce_to_integer, BigInt, Value};

/// Hex digits in a packed scalar address.
pub const ADDRESS_HEX_LEN: usize = 40;

/// Hex digits in a 32-byte word, the width of array-widened elements.
pub const WORD_HEX_LEN: usize = 64;

/// Largest `N` accepted for `bytesN`.
pub const MAX_FIXED_BYTES: usize = 32;

/// A single `{type, value}` pair to encode.
///
/// Deserializes from `{"type": ..., "value": ...}` or the short form
/// `{"t": ..., "v": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "type", alias = "t")]
    pub ty: String,
    #[serde(alias = "v")]
    pub value: Value,
}

impl Entry {
    pub fn new(ty: impl Into<String>, value: impl Into<Value>) -> Self {
        Entry {
            ty: ty.into(),
            value: value.into(),
        }
    }
}

/// Packs every entry, in order, into one contiguous buffer.
///
/// Stops at the first invalid entry; nothing is returned on error.
pub fn encode_packed(entries: &[Entry]) -> Result<Vec<u8>, PackError> {
    let mut out = Vec::new();
    for entry in entries {
        out.extend_from_slice(&encode_entry(entry)?);
    }
    tracing::debug!(entries = entries.len(), bytes = out.len(), "packed entries");
    Ok(out)
}

/// [`encode_packed`] rendered as a `0x`-prefixed lowercase hex string.
pub fn encode_packed_hex(entries: &[Entry]) -> Result<String, PackError> {
    encode_packed(entries).map(|bytes| bytes_to_hex(&bytes))
}

/// Keccak-256 of the packed encoding, as used for `keccak256(abi.encodePacked(..))`.
pub fn packed_keccak256(entries: &[Entry]) -> Result<[u8; 32], PackError> {
    let packed = encode_packed(entries)?;
    Ok(Keccak256::digest(&packed).into())
}

/// Packs a single entry.
///
/// Array values are packed element by element. When the type name declares
/// `[N]`, the value must have exactly `N` elements. A scalar value is packed
/// as one element even if the type name has an array suffix.
pub fn encode_entry(entry: &Entry) -> Result<Vec<u8>, PackError> {
    let desc = TypeDescriptor::parse(&entry.ty)?;
    let value = normalize_integer_strings(&desc, &entry.value)?;

    let hex = match &value {
        Value::Array(items) => {
            if let Some(expected) = desc.fixed_len() {
                if expected != items.len() {
                    return Err(PackError::ArrayLengthMismatch {
                        ty: desc.name.clone(),
                        expected,
                        actual: items.len(),
                    });
                }
            }
            let mut hex = String::new();
            for item in items {
                if matches!(item, Value::Array(_)) {
                    return Err(PackError::UnsupportedType {
                        ty: desc.name.clone(),
                    });
                }
                let packed = pack_scalar(&desc, item, true)?;
                tracing::trace!(ty = %desc, element = %item, packed = %packed, "packed element");
                hex.push_str(&packed);
            }
            hex
        }
        scalar => pack_scalar(&desc, scalar, false)?,
    };

    let bytes = hex_to_bytes(&hex)?;
    tracing::debug!(ty = %desc, bytes = bytes.len(), "packed entry");
    Ok(bytes)
}

/// Integer-typed strings without a `0x` prefix are decimal and are parsed
/// before anything else looks at them, so `"100"` is one hundred rather
/// than `0x100`.
fn normalize_integer_strings(desc: &TypeDescriptor, value: &Value) -> Result<Value, PackError> {
    if !desc.elementary.is_integer() {
        return Ok(value.clone());
    }
    match value {
        Value::Str(s) if !has_hex_prefix(s.strip_prefix('-').unwrap_or(s)) => {
            s.parse::<BigInt>().map(Value::Integer)
        }
        Value::Array(items) => items
            .iter()
            .map(|item| normalize_integer_strings(desc, item))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

/// Packs one scalar value as lowercase hex digits without a prefix.
///
/// `in_array` is set for elements of an array value and widens `address`
/// and `bytesN` to 32 bytes.
pub fn pack_scalar(
    desc: &TypeDescriptor,
    value: &Value,
    in_array: bool,
) -> Result<String, PackError> {
    match desc.elementary {
        ElementaryType::Bytes(None) => {
            // bytes[] has no packed form.
            reject_array_suffix(desc)?;
            pack_dynamic_bytes(value)
        }
        ElementaryType::String => {
            reject_array_suffix(desc)?;
            let s = value.as_str().ok_or_else(|| mismatch(desc, value))?;
            Ok(strip_hex_prefix(&utf8_to_hex(s)).to_string())
        }
        ElementaryType::Bool => {
            reject_array_suffix(desc)?;
            Ok(if value.is_truthy() { "01" } else { "00" }.to_string())
        }
        ElementaryType::Address => {
            let s = value.as_str().ok_or_else(|| PackError::InvalidAddress {
                value: value.to_string(),
            })?;
            let width = if in_array { WORD_HEX_LEN } else { ADDRESS_HEX_LEN };
            Ok(left_pad(&normalize_address(s)?, width))
        }
        ElementaryType::Bytes(Some(size)) => pack_fixed_bytes(desc, size, value, in_array),
        ElementaryType::Uint(width) => {
            check_int_width(desc, width)?;
            let num = coerce_to_integer(value)?;
            check_bit_len(&num, width)?;
            if num.is_negative() {
                return Err(PackError::NegativeUnsigned {
                    value: num.to_string(),
                });
            }
            Ok(num.to_be_hex(width))
        }
        ElementaryType::Int(width) => {
            check_int_width(desc, width)?;
            let num = coerce_to_integer(value)?;
            check_bit_len(&num, width)?;
            Ok(num.to_be_hex(width))
        }
    }
}

fn pack_dynamic_bytes(value: &Value) -> Result<String, PackError> {
    let invalid = || PackError::InvalidBytesLiteral {
        value: value.to_string(),
    };
    let s = value.as_str().ok_or_else(invalid)?;
    let digits = strip_hex_prefix(s);
    if digits.len() % 2 != 0 || !is_hex_digits(digits) {
        return Err(invalid());
    }
    Ok(digits.to_ascii_lowercase())
}

fn pack_fixed_bytes(
    desc: &TypeDescriptor,
    size: usize,
    value: &Value,
    in_array: bool,
) -> Result<String, PackError> {
    if !(1..=MAX_FIXED_BYTES).contains(&size) {
        return Err(PackError::InvalidDeclaredSize {
            ty: desc.name.clone(),
            size,
        });
    }
    // Array elements are full 32-byte slices whatever the declared size.
    let size = if in_array { MAX_FIXED_BYTES } else { size };

    let s = value.as_str().ok_or_else(|| mismatch(desc, value))?;
    let digits = strip_hex_prefix(s);
    if !is_hex_digits(digits) {
        return Err(PackError::InvalidBytesLiteral {
            value: s.to_string(),
        });
    }
    if digits.len() > size * 2 {
        return Err(PackError::BytesExceedSize {
            size,
            len: digits.len().div_ceil(2),
        });
    }
    Ok(right_pad(&digits.to_ascii_lowercase(), size * 2))
}

fn check_int_width(desc: &TypeDescriptor, width: usize) -> Result<(), PackError> {
    if width % 8 != 0 || !(8..=256).contains(&width) {
        return Err(PackError::InvalidDeclaredSize {
            ty: desc.name.clone(),
            size: width,
        });
    }
    Ok(())
}

fn check_bit_len(num: &BigInt, width: usize) -> Result<(), PackError> {
    let bits = num.bit_len();
    if bits > width {
        return Err(PackError::ValueExceedsWidth { width, bits });
    }
    Ok(())
}

fn reject_array_suffix(desc: &TypeDescriptor) -> Result<(), PackError> {
    if desc.array.is_some() {
        return Err(PackError::UnsupportedType {
            ty: desc.name.clone(),
        });
    }
    Ok(())
}

fn mismatch(desc: &TypeDescriptor, value: &Value) -> PackError {
    PackError::TypeMismatch {
        ty: desc.name.clone(),
        value: value.to_string(),
    }
}
