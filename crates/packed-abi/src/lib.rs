//! Solidity-style non-standard packed encoding (`abi.encodePacked`).
//!
//! This crate provides:
//! - Parsing of elementary type names (`uint256`, `bytes32`, `address[]`, ...)
//! - Coercion of decimal/hex strings and native numbers to 256-bit integers
//! - EIP-55 address validation
//! - Packed encoding of `{type, value}` entries into one byte buffer
//!
//! ```
//! use packed_abi::{encode_packed, Entry};
//!
//! let packed = encode_packed(&[
//!     Entry::new("uint8", 1u8),
//!     Entry::new("bool", true),
//!     Entry::new("string", "ab"),
//! ])?;
//! assert_eq!(packed, vec![0x01, 0x01, 0x61, 0x62]);
//! # Ok::<(), packed_abi::PackError>(())
//! ```

pub mod address;
pub mod encode;
pub mod error;
pub mod types;
pub mod value;

pub use encode::{encode_packed, encode_packed_hex, packed_keccak256, Entry};
pub use error::PackError;
pub use types::{ArraySuffix, ElementaryType, TypeDescriptor};
pub use value::{coerce_to_integer, BigInt, Value, WideUint, MAX_INTEGER_BITS};
