//! Address validation and EIP-55 checksums.

use codec_utils::hex::{is_hex_digits, strip_hex_prefix};
use sha3::{Digest, Keccak256};

use crate::error::PackError;

/// Returns `true` if `address` is a 20-byte hex address.
///
/// The `0x` prefix is optional. All-lowercase and all-uppercase addresses
/// carry no checksum and are accepted as-is; mixed case must match the
/// EIP-55 checksum.
pub fn is_valid_address(address: &str) -> bool {
    let hex_part = strip_hex_prefix(address);

    if hex_part.len() != 40 || !is_hex_digits(hex_part) {
        return false;
    }

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return true;
    }

    // Mixed case: verify EIP-55 checksum on the digits alone.
    checksum_address(hex_part).is_ok_and(|checksummed| &checksummed[2..] == hex_part)
}

/// Applies EIP-55 mixed-case checksum encoding to an address.
///
/// Accepts any casing, with or without `0x`. Returns the `0x`-prefixed
/// checksummed form.
pub fn checksum_address(address: &str) -> Result<String, PackError> {
    let hex_part = strip_hex_prefix(address).to_lowercase();

    if hex_part.len() != 40 || !is_hex_digits(&hex_part) {
        return Err(PackError::InvalidAddress {
            value: address.to_string(),
        });
    }

    // EIP-55: hash the lowercase hex address (without 0x).
    let hash = Keccak256::digest(hex_part.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        // High nibble for even positions, low nibble for odd.
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}

/// Lowercase hex digits of a validated address, without prefix.
pub(crate) fn normalize_address(address: &str) -> Result<String, PackError> {
    if !is_valid_address(address) {
        return Err(PackError::InvalidAddress {
            value: address.to_string(),
        });
    }
    Ok(strip_hex_prefix(address).to_lowercase())
}
