use crate::error::CodecError;

/// Removes a leading `0x` or `0X` from `s`, if present.
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Returns `true` if `s` has a leading `0x` or `0X`.
pub fn has_hex_prefix(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

/// Returns `true` if every character of `s` is an ASCII hex digit.
///
/// The empty string counts as valid.
pub fn is_hex_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Strict hex check: an optional `-`, a mandatory `0x` prefix, then zero or
/// more hex digits. Case-insensitive.
///
/// A string of bare hex digits without the prefix is *not* strict hex.
pub fn is_hex_strict(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    has_hex_prefix(s) && is_hex_digits(&s[2..])
}

/// Decodes a hex string (prefix optional) into bytes.
///
/// An odd number of digits is treated as if it had one leading zero, so
/// `"0x123"` decodes to `[0x01, 0x23]`.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, CodecError> {
    let digits = strip_hex_prefix(s);
    if !is_hex_digits(digits) {
        return Err(CodecError::InvalidHex(s.to_string()));
    }

    let decoded = if digits.len() % 2 == 1 {
        ::hex::decode(format!("0{digits}"))
    } else {
        ::hex::decode(digits)
    };
    decoded.map_err(|e| CodecError::InvalidHex(format!("{s}: {e}")))
}

/// Encodes bytes as a lowercase `0x`-prefixed hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", ::hex::encode(bytes))
}

/// Converts a UTF-8 string to a `0x`-prefixed hex string of its bytes.
///
/// Leading and trailing NUL characters are dropped before encoding,
/// matching the web3 `utf8ToHex` convention. NULs in the middle are kept.
pub fn utf8_to_hex(s: &str) -> String {
    bytes_to_hex(s.trim_matches('\0').as_bytes())
}
