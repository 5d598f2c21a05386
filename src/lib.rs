//! # compact-float
//!
//! A compact, self-delimiting binary encoding for decimal floating-point
//! numbers.
//!
//! Values are held as [`DFloat`]: a 64-bit signed coefficient and a 32-bit
//! exponent (value = coefficient × 10^exponent), plus signed zero, signed
//! infinity and quiet/signaling NaN. Coefficients too wide for `i64` are
//! carried by the arbitrary-precision [`BigDecimal`].
//!
//! ## Examples
//!
//! ```rust
//! use compact_float::{decode, DFloat, Decoded};
//!
//! // Parse a literal. Rounding would be reported, not hidden.
//! let conversion = DFloat::parse("1.5").unwrap();
//! assert!(conversion.is_exact());
//! let value = conversion.into_value();
//!
//! // Two bytes on the wire: exponent header, then coefficient.
//! let bytes = value.to_bytes();
//! assert_eq!(bytes, [0x06, 0x0f]);
//!
//! // Decoding reports how many bytes the value occupied.
//! let (decoded, used) = decode(&bytes).unwrap();
//! assert_eq!(decoded, Decoded::Float(value));
//! assert_eq!(used, 2);
//! ```
//!
//! ## Format Overview
//!
//! - **Specials**: `02` (+0), `03` (-0), `80 00` (NaN), `81 00` (sNaN),
//!   `82 00` (+inf), `83 00` (-inf)
//! - **Exponent header** (ULEB128): `|exponent| << 2 | exponent_sign << 1 | coefficient_sign`
//! - **Coefficient** (ULEB128): the coefficient magnitude, unbounded
//!
//! The encoding is self-terminating: decoders report the bytes consumed and
//! ignore anything after the value.

pub(crate) mod big;
pub(crate) mod decoder;
pub(crate) mod dfloat;
pub(crate) mod encoder;
pub(crate) mod error;
pub(crate) mod parse;
pub(crate) mod varint;

// Re-export main types and functions
pub use big::{BigDecimal, Form, Format};
pub use decoder::{decode, decode_from, Decoded};
pub use dfloat::{DFloat, SpecialValue, EXP_SPECIAL};
pub use encoder::{
    encode, encode_big, encode_big_to_slice, encode_big_to_vec, encode_to_slice, encode_to_vec,
    max_encode_length, max_encode_length_big, special_bytes, MAX_EXPONENT_MAGNITUDE,
};
pub use error::{
    Conversion, ConversionError, ConversionResult, DecodeError, DecodeResult, EncodeError,
    EncodeResult, ParseError, ParseResult, Precision,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: DFloat) -> DFloat {
        let bytes = value.to_bytes();
        let (decoded, used) = decode(&bytes).unwrap();
        assert_eq!(used, bytes.len());
        decoded.as_dfloat().unwrap()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let value: DFloat = "123.456".parse().unwrap();
        assert_eq!(roundtrip(value), value);
    }

    #[test]
    fn test_special_values() {
        let special_values = [
            (DFloat::ZERO, "zero"),
            (DFloat::NEGATIVE_ZERO, "negative zero"),
            (DFloat::INFINITY, "positive infinity"),
            (DFloat::NEGATIVE_INFINITY, "negative infinity"),
            (DFloat::NAN, "NaN"),
            (DFloat::SIGNALING_NAN, "signaling NaN"),
        ];

        for (value, name) in special_values {
            assert_eq!(roundtrip(value), value, "{name}");
        }
    }

    #[test]
    fn test_extreme_values() {
        for value in [
            DFloat::new(i32::MAX, i64::MAX),
            DFloat::new(-i32::MAX, -i64::MAX),
            DFloat::new(i32::MIN + 1, 1),
        ] {
            assert_eq!(roundtrip(value), value);
        }
    }

    #[test]
    fn test_float_conversion_through_wire() {
        let value = DFloat::from_f64(0.147_344_521_913_454_3, 6);
        assert!(value.is_rounded());
        let bytes = value.value().to_bytes();
        assert_eq!(bytes, [26, 145, 255, 8]);
        assert_eq!(roundtrip(*value.value()).to_string(), "0.147345");
    }
}
