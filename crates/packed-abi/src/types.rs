//! Type-name parsing for elementary and array types.

use std::fmt;
use std::str::FromStr;

use crate::error::PackError;

/// Width assumed for bare `int` / `uint`.
pub const DEFAULT_INT_WIDTH: usize = 256;

/// The six elementary kinds understood by the packed encoder.
///
/// The payload is the numeric suffix of the type name: a bit width for
/// `uint`/`int`, a byte width for `bytes`. It is not range-checked here;
/// the packing rule rejects out-of-range sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementaryType {
    /// `bytes` (dynamic, `None`) or `bytesN`.
    Bytes(Option<usize>),
    String,
    Bool,
    Address,
    Uint(usize),
    Int(usize),
}

impl ElementaryType {
    /// Whether values of this type go through integer coercion.
    pub fn is_integer(&self) -> bool {
        matches!(self, ElementaryType::Uint(_) | ElementaryType::Int(_))
    }
}

impl fmt::Display for ElementaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementaryType::Bytes(None) => f.write_str("bytes"),
            ElementaryType::Bytes(Some(n)) => write!(f, "bytes{n}"),
            ElementaryType::String => f.write_str("string"),
            ElementaryType::Bool => f.write_str("bool"),
            ElementaryType::Address => f.write_str("address"),
            ElementaryType::Uint(n) => write!(f, "uint{n}"),
            ElementaryType::Int(n) => write!(f, "int{n}"),
        }
    }
}

/// Array suffix of a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArraySuffix {
    /// `T[N]`
    Fixed(usize),
    /// `T[]`; the length comes from the runtime value.
    Dynamic,
}

/// A parsed type name such as `uint256`, `bytes32[2]` or `address[]`.
///
/// Descriptors are cheap and parsed fresh for every encoded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// The type name exactly as supplied, used in error messages.
    pub name: String,
    pub elementary: ElementaryType,
    pub array: Option<ArraySuffix>,
}

impl TypeDescriptor {
    pub fn parse(name: &str) -> Result<Self, PackError> {
        let (_, array) = split_array_suffix(name)?;
        Ok(TypeDescriptor {
            name: name.to_string(),
            elementary: parse_elementary_name(name)?,
            array,
        })
    }

    /// Declared fixed length, if the name carries `[N]`.
    pub fn fixed_len(&self) -> Option<usize> {
        match self.array {
            Some(ArraySuffix::Fixed(n)) => Some(n),
            _ => None,
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeDescriptor::parse(s)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.elementary)?;
        match self.array {
            Some(ArraySuffix::Fixed(n)) => write!(f, "[{n}]"),
            Some(ArraySuffix::Dynamic) => f.write_str("[]"),
            None => Ok(()),
        }
    }
}

/// Splits `name` into its base and an optional trailing `[N]` / `[]`.
///
/// Only one level of array suffix is recognised; `uint8[2][3]` leaves
/// `uint8[2]` as the base, which then fails elementary-name parsing.
fn split_array_suffix(name: &str) -> Result<(&str, Option<ArraySuffix>), PackError> {
    let Some(body) = name.strip_suffix(']') else {
        return Ok((name, None));
    };
    let open = body.rfind('[').ok_or_else(|| unsupported(name))?;
    let (base, len) = (&body[..open], &body[open + 1..]);

    if len.is_empty() {
        return Ok((base, Some(ArraySuffix::Dynamic)));
    }
    if !len.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported(name));
    }
    let n = len.parse().map_err(|_| unsupported(name))?;
    Ok((base, Some(ArraySuffix::Fixed(n))))
}

/// Parses the array suffix of a type name: `Fixed(N)` for `[N]`, `Dynamic`
/// for `[]`, `None` for a scalar type.
pub fn parse_array_suffix(name: &str) -> Result<Option<ArraySuffix>, PackError> {
    split_array_suffix(name).map(|(_, array)| array)
}

/// Parses the numeric suffix of the base type name (`uint256` -> 256,
/// `bytes32` -> 32). Returns `None` when the base has no digits.
///
/// The array suffix, if any, is ignored: `bytes4[2]` -> 4.
pub fn parse_size_suffix(name: &str) -> Option<usize> {
    let base = split_array_suffix(name).map_or(name, |(base, _)| base);
    let (_, digits) = split_base(base);
    parse_digits(digits)
}

/// Resolves the elementary kind of a type name, canonicalizing bare
/// `int`/`uint` to 256 bits.
pub fn parse_elementary_name(name: &str) -> Result<ElementaryType, PackError> {
    let (base, _) = split_array_suffix(name)?;
    let (kind, digits) = split_base(base);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(unsupported(name));
    }

    let elementary = match (kind, parse_digits(digits)) {
        ("bytes", size) => ElementaryType::Bytes(size),
        ("uint", size) => ElementaryType::Uint(size.unwrap_or(DEFAULT_INT_WIDTH)),
        ("int", size) => ElementaryType::Int(size.unwrap_or(DEFAULT_INT_WIDTH)),
        ("string", None) => ElementaryType::String,
        ("bool", None) => ElementaryType::Bool,
        ("address", None) => ElementaryType::Address,
        _ => return Err(unsupported(name)),
    };
    Ok(elementary)
}

/// Splits a base name at its first digit: `uint256` -> (`uint`, `256`).
fn split_base(base: &str) -> (&str, &str) {
    let idx = base
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(base.len());
    base.split_at(idx)
}

fn parse_digits(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    // Absurdly long suffixes saturate and are rejected by the range checks.
    Some(digits.parse().unwrap_or(usize::MAX))
}

fn unsupported(name: &str) -> PackError {
    PackError::UnsupportedType {
        ty: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sized_integers() {
        assert_eq!(
            parse_elementary_name("uint256").unwrap(),
            ElementaryType::Uint(256)
        );
        assert_eq!(parse_elementary_name("int8").unwrap(), ElementaryType::Int(8));
    }

    #[test]
    fn bare_int_and_uint_default_to_256() {
        assert_eq!(parse_elementary_name("uint").unwrap(), ElementaryType::Uint(256));
        assert_eq!(parse_elementary_name("int").unwrap(), ElementaryType::Int(256));
        assert_eq!(
            parse_elementary_name("int[]").unwrap(),
            ElementaryType::Int(256)
        );
    }

    #[test]
    fn bytes_with_and_without_size() {
        assert_eq!(
            parse_elementary_name("bytes").unwrap(),
            ElementaryType::Bytes(None)
        );
        assert_eq!(
            parse_elementary_name("bytes32").unwrap(),
            ElementaryType::Bytes(Some(32))
        );
    }

    #[test]
    fn sizeless_kinds() {
        assert_eq!(parse_elementary_name("bool").unwrap(), ElementaryType::Bool);
        assert_eq!(
            parse_elementary_name("string").unwrap(),
            ElementaryType::String
        );
        assert_eq!(
            parse_elementary_name("address[4]").unwrap(),
            ElementaryType::Address
        );
    }

    #[test]
    fn size_suffix_ignores_array_suffix() {
        assert_eq!(parse_size_suffix("uint256"), Some(256));
        assert_eq!(parse_size_suffix("bytes4[2]"), Some(4));
        assert_eq!(parse_size_suffix("address[3]"), None);
        assert_eq!(parse_size_suffix("int"), None);
    }

    #[test]
    fn array_suffixes() {
        assert_eq!(parse_array_suffix("uint8").unwrap(), None);
        assert_eq!(
            parse_array_suffix("uint8[3]").unwrap(),
            Some(ArraySuffix::Fixed(3))
        );
        assert_eq!(
            parse_array_suffix("address[]").unwrap(),
            Some(ArraySuffix::Dynamic)
        );
    }

    #[test]
    fn malformed_array_suffix_is_unsupported() {
        assert!(matches!(
            parse_array_suffix("uint8[x]"),
            Err(PackError::UnsupportedType { .. })
        ));
        assert!(matches!(
            parse_array_suffix("uint8]"),
            Err(PackError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn unknown_names_are_unsupported() {
        for name in ["tuple", "fixed128x18", "function", "", "string8", "bool1", "uint8[2][3]"] {
            let err = TypeDescriptor::parse(name).unwrap_err();
            assert!(
                matches!(err, PackError::UnsupportedType { ref ty } if ty == name),
                "expected UnsupportedType for {name:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn descriptor_display_is_canonical() {
        let desc: TypeDescriptor = "uint[2]".parse().unwrap();
        assert_eq!(desc.to_string(), "uint256[2]");
        assert_eq!(desc.name, "uint[2]");
        assert_eq!(desc.fixed_len(), Some(2));

        let desc: TypeDescriptor = "bytes[]".parse().unwrap();
        assert_eq!(desc.to_string(), "bytes[]");
        assert_eq!(desc.fixed_len(), None);
    }

    #[test]
    fn out_of_range_sizes_still_parse() {
        // Range checks belong to the packing rule.
        assert_eq!(parse_elementary_name("uint7").unwrap(), ElementaryType::Uint(7));
        assert_eq!(
            parse_elementary_name("bytes33").unwrap(),
            ElementaryType::Bytes(Some(33))
        );
    }
}
