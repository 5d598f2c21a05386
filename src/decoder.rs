//! Decoding of the compact float wire format
//!
//! The decoder reads the exponent header, recognises the fixed special-value
//! sequences, then reads the coefficient. A coefficient that does not fit an
//! `i64` comes back as a [`BigDecimal`] instead of a [`DFloat`].

use std::fmt;
use std::io;

use num_bigint::BigUint;
use tracing::debug;

use crate::big::BigDecimal;
use crate::dfloat::{DFloat, SpecialValue};
use crate::error::{DecodeError, DecodeResult};
use crate::varint::{self, ByteSource, ReadSource, SliceSource, Varint};

/// Largest valid exponent header: a 31-bit magnitude plus two sign bits.
const MAX_EXPONENT_FIELD: u64 = 0x1_ffff_ffff;

const COEFFICIENT_NEGATIVE: u64 = 0b01;
const EXPONENT_NEGATIVE: u64 = 0b10;

/// A decoded value: a [`DFloat`] when the coefficient fits, otherwise a [`BigDecimal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Float(DFloat),
    Big(BigDecimal),
}

impl Decoded {
    #[must_use]
    pub const fn as_dfloat(&self) -> Option<DFloat> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Big(_) => None,
        }
    }

    #[must_use]
    pub const fn as_big_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Self::Float(_) => None,
            Self::Big(value) => Some(value),
        }
    }

    /// Convert to a [`BigDecimal`] whichever way the value was decoded.
    #[must_use]
    pub fn into_big_decimal(self) -> BigDecimal {
        match self {
            Self::Float(value) => value.to_big_decimal(),
            Self::Big(value) => value,
        }
    }
}

impl From<DFloat> for Decoded {
    fn from(value: DFloat) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => fmt::Display::fmt(value, f),
            Self::Big(value) => fmt::Display::fmt(value, f),
        }
    }
}

/// Decode one value from the start of `bytes`.
///
/// Returns the value and the number of bytes it occupied. Bytes after the
/// value are ignored.
///
/// # Errors
///
/// Returns [`DecodeError::Incomplete`] if `bytes` ends inside the value, or
/// [`DecodeError::ExponentTooBig`] if the exponent header is out of range.
pub fn decode(bytes: &[u8]) -> DecodeResult<(Decoded, usize)> {
    decode_source(&mut SliceSource::new(bytes))
}

/// Decode one value from `reader`, reading exactly the bytes it occupies.
///
/// # Errors
///
/// As [`decode`], plus [`DecodeError::Io`] if the reader fails.
pub fn decode_from(reader: &mut impl io::Read) -> DecodeResult<(Decoded, usize)> {
    decode_source(&mut ReadSource::new(reader))
}

fn decode_source(source: &mut impl ByteSource) -> DecodeResult<(Decoded, usize)> {
    let Some((field, header_len)) = varint::read_at_most(source, MAX_EXPONENT_FIELD)? else {
        return Err(DecodeError::ExponentTooBig(format!(
            "magnitude above {}",
            MAX_EXPONENT_FIELD >> 2
        )));
    };

    if let Some(value) = special_value(field, header_len) {
        return Ok((Decoded::Float(value), header_len));
    }

    let exponent_negative = field & EXPONENT_NEGATIVE != 0;
    let negative = field & COEFFICIENT_NEGATIVE != 0;
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let magnitude = (field >> 2) as i32;
    let exponent = if exponent_negative { -magnitude } else { magnitude };

    let (coefficient, coefficient_len) = varint::read(source)?;
    let consumed = header_len + coefficient_len;
    let value = match coefficient {
        Varint::Word(0) => Decoded::Float(if negative {
            DFloat::NEGATIVE_ZERO
        } else {
            DFloat::ZERO
        }),
        Varint::Word(word) => match i64::try_from(word) {
            Ok(c) => Decoded::Float(DFloat::from_parts(exponent, if negative { -c } else { c })),
            Err(_) => big_value(negative, BigUint::from(word), exponent),
        },
        Varint::Big(big) => big_value(negative, big, exponent),
    };
    Ok((value, consumed))
}

/// Recognise the one- and two-byte special sequences.
fn special_value(field: u64, header_len: usize) -> Option<DFloat> {
    let special = match (header_len, field) {
        (1, 2) => return Some(DFloat::ZERO),
        (1, 3) => SpecialValue::NegativeZero,
        (2, 0) => SpecialValue::QuietNaN,
        (2, 1) => SpecialValue::SignalingNaN,
        (2, 2) => SpecialValue::Infinity,
        (2, 3) => SpecialValue::NegativeInfinity,
        _ => return None,
    };
    Some(DFloat::from_special(special))
}

fn big_value(negative: bool, coefficient: BigUint, exponent: i32) -> Decoded {
    debug!(bits = coefficient.bits(), exponent, "coefficient exceeds i64, decoding as BigDecimal");
    Decoded::Big(BigDecimal::from_parts(negative, coefficient, exponent))
}
