//! Runtime values and integer coercion.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::ruint::Uint;
use alloy_primitives::{I256, U256};
use codec_utils::hex::{is_hex_strict, strip_hex_prefix};
use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// Largest integer a native `f64` represents exactly (2^53 - 1).
const MAX_SAFE_FLOAT: f64 = 9_007_199_254_740_991.0;

/// Widest magnitude an integer literal may have.
pub const MAX_INTEGER_BITS: usize = 1024;

/// Magnitude storage for [`BigInt`].
pub type WideUint = Uint<MAX_INTEGER_BITS, 16>;

/// A signed integer with a magnitude of up to [`MAX_INTEGER_BITS`] bits.
///
/// Wider than any encodable width, so an oversized value still has an exact
/// bit length to report. Zero is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BigInt {
    negative: bool,
    magnitude: WideUint,
}

impl BigInt {
    pub fn new(negative: bool, magnitude: WideUint) -> Self {
        BigInt {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn magnitude(&self) -> WideUint {
        self.magnitude
    }

    /// Bit length of the magnitude; the sign is not counted.
    pub fn bit_len(&self) -> usize {
        self.magnitude.bit_len()
    }

    /// Two's-complement bit pattern of this value at `width` bits.
    ///
    /// Bits above `width` are cleared. Callers check [`Self::bit_len`]
    /// against `width` first.
    pub fn to_twos(&self, width: usize) -> WideUint {
        let raw = if self.negative {
            self.magnitude.wrapping_neg()
        } else {
            self.magnitude
        };
        raw & width_mask(width)
    }

    /// Big-endian hex of [`Self::to_twos`], exactly `width / 4` digits.
    ///
    /// `width` must be a multiple of 8 no greater than 256.
    pub fn to_be_hex(&self, width: usize) -> String {
        let bytes = self.to_twos(width).to_be_bytes::<{ MAX_INTEGER_BITS / 8 }>();
        hex::encode(&bytes[bytes.len() - width / 8..])
    }
}

fn width_mask(width: usize) -> WideUint {
    if width >= MAX_INTEGER_BITS {
        WideUint::MAX
    } else {
        (WideUint::from(1u8) << width) - WideUint::from(1u8)
    }
}

fn widen(v: U256) -> WideUint {
    WideUint::from_be_slice(&v.to_be_bytes::<32>())
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

impl FromStr for BigInt {
    type Err = PackError;

    /// Parses `0x`-prefixed strings as hex and everything else as decimal.
    /// Both accept one leading `-`.
    ///
    /// Bare hex digits without the prefix are decimal: `"100"` is one
    /// hundred, and `"ff"` is not a number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (digits, radix) = if is_hex_strict(s) {
            (strip_hex_prefix(body), 16)
        } else {
            if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
                return Err(PackError::NotANumber {
                    value: s.to_string(),
                });
            }
            (body, 10)
        };

        if digits.is_empty() {
            return Ok(BigInt::default());
        }
        let magnitude =
            WideUint::from_str_radix(&digits.to_ascii_lowercase(), radix).map_err(|_| {
                PackError::IntegerOverflow {
                    value: s.to_string(),
                }
            })?;
        Ok(BigInt::new(negative, magnitude))
    }
}

impl From<i128> for BigInt {
    fn from(v: i128) -> Self {
        BigInt::new(v < 0, WideUint::from(v.unsigned_abs()))
    }
}

impl From<u128> for BigInt {
    fn from(v: u128) -> Self {
        BigInt::new(false, WideUint::from(v))
    }
}

impl From<U256> for BigInt {
    fn from(v: U256) -> Self {
        BigInt::new(false, widen(v))
    }
}

impl From<I256> for BigInt {
    fn from(v: I256) -> Self {
        BigInt::new(v.is_negative(), widen(v.unsigned_abs()))
    }
}

/// A runtime value to be packed.
///
/// Mirrors what a JSON caller can supply: numbers, strings, booleans and
/// one level of arrays, plus an explicit [`BigInt`] for callers that
/// already hold a wide integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Integer(BigInt),
    Str(String),
    Array(Vec<Value>),
}

impl Value {
    /// JavaScript-style truthiness, used by the `bool` rule.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::Integer(n) => !n.magnitude().is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Coerces a value to an integer.
///
/// - [`Value::Integer`] passes through unchanged.
/// - [`Value::Int`] converts directly.
/// - [`Value::Float`] must be finite, integral and within +/-(2^53 - 1).
/// - [`Value::Str`] is hex when it matches `^(-)?0x[0-9a-f]*$`
///   (case-insensitive), decimal otherwise.
///
/// Anything else is [`PackError::NotANumber`].
pub fn coerce_to_integer(value: &Value) -> Result<BigInt, PackError> {
    match value {
        Value::Integer(n) => Ok(*n),
        Value::Int(n) => Ok(BigInt::from(*n)),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_FLOAT => {
            Ok(BigInt::from(*f as i128))
        }
        Value::Str(s) => s.parse(),
        other => Err(PackError::NotANumber {
            value: other.to_string(),
        }),
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(v as i128)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, isize, usize);

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        match i128::try_from(v) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Integer(BigInt::from(v)),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Value::Integer(v)
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Integer(v.into())
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Integer(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = PackError;

    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i.into())
                } else if let Some(u) = n.as_u64() {
                    Value::Int(u.into())
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(PackError::TypeMismatch {
                    ty: "value".into(),
                    value: v.to_string(),
                })
            }
        })
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => match i64::try_from(n) {
                Ok(i) => i.into(),
                Err(_) => serde_json::Value::String(n.to_string()),
            },
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            // Decimal strings survive JSON without losing precision.
            Value::Integer(n) => serde_json::Value::String(n.to_string()),
            Value::Str(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decimal_strings_parse_base_10() {
        let n: BigInt = "100".parse().unwrap();
        assert_eq!(n.magnitude(), WideUint::from(100u64));
        assert!(!n.is_negative());

        let n: BigInt = "-42".parse().unwrap();
        assert!(n.is_negative());
        assert_eq!(n.to_string(), "-42");
    }

    #[test]
    fn hex_strings_require_prefix() {
        let n: BigInt = "0xff".parse().unwrap();
        assert_eq!(n.magnitude(), WideUint::from(255u64));

        let n: BigInt = "0XFF".parse().unwrap();
        assert_eq!(n.magnitude(), WideUint::from(255u64));

        let n: BigInt = "-0x10".parse().unwrap();
        assert_eq!(n.to_string(), "-16");

        // Bare hex digits are decimal, so letters are rejected.
        assert!(matches!(
            "ff".parse::<BigInt>(),
            Err(PackError::NotANumber { .. })
        ));
    }

    #[test]
    fn empty_hex_is_zero() {
        let n: BigInt = "0x".parse().unwrap();
        assert_eq!(n, BigInt::default());
    }

    #[test]
    fn negative_zero_is_not_negative() {
        let n: BigInt = "-0".parse().unwrap();
        assert!(!n.is_negative());
        assert_eq!(n.to_string(), "0");
    }

    #[test]
    fn malformed_strings_are_not_numbers() {
        for s in ["", "-", "1e3", "12 ", "1.5", "abc", "0xzz"] {
            assert!(
                matches!(s.parse::<BigInt>(), Err(PackError::NotANumber { .. })),
                "{s:?} should not parse"
            );
        }
    }

    #[test]
    fn wider_than_256_bits_keeps_exact_bit_len() {
        let s = format!("0x1{}", "0".repeat(64));
        assert_eq!(s.parse::<BigInt>().unwrap().bit_len(), 257);

        let max = U256::MAX.to_string();
        assert_eq!(max.parse::<BigInt>().unwrap().bit_len(), 256);

        let n: BigInt = format!("-{}", U256::MAX).parse().unwrap();
        assert!(n.is_negative());
        assert_eq!(n.bit_len(), 256);
    }

    #[test]
    fn wider_than_max_integer_bits_overflows() {
        let s = format!("0x1{}", "0".repeat(MAX_INTEGER_BITS / 4));
        assert!(matches!(
            s.parse::<BigInt>(),
            Err(PackError::IntegerOverflow { .. })
        ));

        let s = format!("0x{}", "f".repeat(MAX_INTEGER_BITS / 4));
        assert_eq!(s.parse::<BigInt>().unwrap().bit_len(), MAX_INTEGER_BITS);
    }

    #[test]
    fn twos_complement_at_width() {
        let n = BigInt::from(-1i128);
        assert_eq!(n.to_be_hex(8), "ff");
        assert_eq!(n.to_be_hex(256), "f".repeat(64));

        let n = BigInt::from(-200i128);
        assert_eq!(n.to_be_hex(8), "38");

        let n = BigInt::from(-65000i128);
        assert_eq!(n.to_be_hex(16), "0218");
    }

    #[test]
    fn positive_hex_is_left_padded() {
        assert_eq!(BigInt::from(1i128).to_be_hex(16), "0001");
        assert_eq!(BigInt::from(255i128).to_be_hex(8), "ff");
    }

    #[test]
    fn coerce_native_numbers() {
        assert_eq!(
            coerce_to_integer(&Value::Int(-5)).unwrap(),
            BigInt::from(-5i128)
        );
        assert_eq!(
            coerce_to_integer(&Value::Float(3.0)).unwrap(),
            BigInt::from(3i128)
        );
    }

    #[test]
    fn coerce_rejects_unsafe_floats() {
        for f in [1.5, f64::NAN, f64::INFINITY, 1e300] {
            assert!(matches!(
                coerce_to_integer(&Value::Float(f)),
                Err(PackError::NotANumber { .. })
            ));
        }
    }

    #[test]
    fn coerce_passes_big_integers_through() {
        let n = BigInt::from(U256::MAX);
        assert_eq!(coerce_to_integer(&Value::Integer(n)).unwrap(), n);
    }

    #[test]
    fn coerce_rejects_other_shapes() {
        for v in [Value::Null, Value::Bool(true), Value::Array(vec![])] {
            assert!(matches!(
                coerce_to_integer(&v),
                Err(PackError::NotANumber { .. })
            ));
        }
    }

    #[test]
    fn signed_conversion() {
        let n = BigInt::from(I256::try_from(-7i64).unwrap());
        assert!(n.is_negative());
        assert_eq!(n.magnitude(), WideUint::from(7u64));
    }

    #[test]
    fn truthiness() {
        assert!(Value::from(true).is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(Value::from(1).is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(Value::from("x").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::from(Vec::<u8>::new()).is_truthy());
    }

    #[test]
    fn from_json() {
        let v = Value::try_from(json!([1, "0x2", true, null, 1.5])).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Int(1),
                Value::Str("0x2".into()),
                Value::Bool(true),
                Value::Null,
                Value::Float(1.5),
            ])
        );
    }

    #[test]
    fn json_objects_are_rejected() {
        assert!(Value::try_from(json!({ "a": 1 })).is_err());
    }

    #[test]
    fn big_integers_serialize_as_decimal_strings() {
        let v = Value::from(U256::MAX);
        let json: serde_json::Value = v.into();
        assert_eq!(json, json!(U256::MAX.to_string()));
    }

    #[test]
    fn display_arrays() {
        let v = Value::from(vec![1, 2, 3]);
        assert_eq!(v.to_string(), "[1,2,3]");
    }
}
