//! Zero-padding for hex strings.
//!
//! Both helpers operate on hex digits, not bytes: `chars` is the target
//! number of hex characters. A `0x` prefix on the input is preserved on
//! the output and does not count toward `chars`.

use crate::hex::{has_hex_prefix, strip_hex_prefix};

/// Left-pads the hex digits of `value` with `'0'` to `chars` characters.
///
/// Numbers are big-endian, so padding goes on the left. Inputs already at
/// least `chars` wide are returned unchanged.
pub fn left_pad(value: &str, chars: usize) -> String {
    let digits = strip_hex_prefix(value);
    let prefix = if has_hex_prefix(value) { "0x" } else { "" };
    format!("{prefix}{digits:0>chars$}")
}

/// Right-pads the hex digits of `value` with `'0'` to `chars` characters.
///
/// Used for fixed-size byte strings, which are left-aligned.
pub fn right_pad(value: &str, chars: usize) -> String {
    let digits = strip_hex_prefix(value);
    let prefix = if has_hex_prefix(value) { "0x" } else { "" };
    format!("{prefix}{digits:0<chars$}")
}
