//! # codec-utils
//!
//! Hex string, padding, and JSON serialization helpers shared by the
//! packed encoder.

pub mod error;
pub mod hex;
pub mod json;
pub mod pad;

pub use error::CodecError;
