//! Encoding into the compact float wire format
//!
//! A finite non-zero value is written as two unsigned LEB128 varints. The
//! first packs the exponent magnitude with both signs:
//!
//! ```text
//! |exponent| << 2 | exponent_negative << 1 | coefficient_negative
//! ```
//!
//! and the second holds the coefficient magnitude. Zeros, infinities and NaNs
//! use the short fixed sequences of [`special_bytes`].

use std::io;

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::big::{BigDecimal, Form};
use crate::dfloat::{DFloat, SpecialValue};
use crate::error::{EncodeError, EncodeResult};
use crate::varint;

const COEFFICIENT_NEGATIVE: u64 = 0b01;
const EXPONENT_NEGATIVE: u64 = 0b10;

/// Largest exponent magnitude the header can carry.
pub const MAX_EXPONENT_MAGNITUDE: u32 = 0x7fff_ffff;

/// Longest encoding of an exponent header (`MAX_EXPONENT_MAGNITUDE << 2 | 0b11`).
const MAX_HEADER_LEN: usize = 5;

const POSITIVE_ZERO: [u8; 1] = [0x02];

/// Return the fixed encoding of a special value.
#[must_use]
pub const fn special_bytes(value: SpecialValue) -> &'static [u8] {
    match value {
        SpecialValue::NegativeZero => &[0x03],
        SpecialValue::QuietNaN => &[0x80, 0x00],
        SpecialValue::SignalingNaN => &[0x81, 0x00],
        SpecialValue::Infinity => &[0x82, 0x00],
        SpecialValue::NegativeInfinity => &[0x83, 0x00],
    }
}

/// Upper bound on the encoded size of any [`DFloat`].
#[must_use]
pub const fn max_encode_length() -> usize {
    MAX_HEADER_LEN + varint::MAX_U64_LEN
}

/// Upper bound on the encoded size of `value`.
#[must_use]
pub fn max_encode_length_big(value: &BigDecimal) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    let bits = value.coefficient().bits() as usize;
    bits / 7 + 1 + MAX_HEADER_LEN
}

#[inline]
fn header(exponent_negative: bool, exponent_magnitude: u32, coefficient_negative: bool) -> u64 {
    let mut field = u64::from(exponent_magnitude) << 2;
    if exponent_negative {
        field |= EXPONENT_NEGATIVE;
    }
    if coefficient_negative {
        field |= COEFFICIENT_NEGATIVE;
    }
    field
}

/// Write `value` into a stack buffer, returning the number of bytes used.
///
/// # Panics
///
/// Panics if `value` is special with an unknown tag.
fn write_dfloat(value: DFloat, buf: &mut [u8; max_encode_length()]) -> usize {
    if let Some(special) = value.special() {
        let bytes = special_bytes(special);
        buf[..bytes.len()].copy_from_slice(bytes);
        return bytes.len();
    }
    if value.is_zero() {
        buf[0] = POSITIVE_ZERO[0];
        return 1;
    }

    let exponent = value.exponent();
    let coefficient = value.coefficient();
    let field = header(exponent < 0, exponent.unsigned_abs(), coefficient < 0);
    let len = varint::write_u64(field, buf);
    len + varint::write_u64(coefficient.unsigned_abs(), &mut buf[len..])
}

/// Encode `value` into the start of `buffer`, returning the number of bytes written.
///
/// # Errors
///
/// Returns [`EncodeError::BufferTooSmall`] if `buffer` cannot hold the
/// encoding. Nothing is written in that case.
///
/// # Panics
///
/// Panics if `value` is special with an unknown tag.
pub fn encode_to_slice(value: DFloat, buffer: &mut [u8]) -> EncodeResult<usize> {
    let mut scratch = [0u8; max_encode_length()];
    let len = write_dfloat(value, &mut scratch);
    let Some(target) = buffer.get_mut(..len) else {
        return Err(EncodeError::BufferTooSmall {
            required: len,
            available: buffer.len(),
        });
    };
    target.copy_from_slice(&scratch[..len]);
    Ok(len)
}

/// Append the encoding of `value` to `out`, returning the number of bytes appended.
///
/// # Panics
///
/// Panics if `value` is special with an unknown tag.
pub fn encode_to_vec(value: DFloat, out: &mut Vec<u8>) -> usize {
    let mut scratch = [0u8; max_encode_length()];
    let len = write_dfloat(value, &mut scratch);
    out.extend_from_slice(&scratch[..len]);
    len
}

/// Write the encoding of `value` to `writer`, returning the number of bytes written.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the writer fails.
///
/// # Panics
///
/// Panics if `value` is special with an unknown tag.
pub fn encode(value: DFloat, writer: &mut impl io::Write) -> EncodeResult<usize> {
    let mut scratch = [0u8; max_encode_length()];
    let len = write_dfloat(value, &mut scratch);
    writer.write_all(&scratch[..len])?;
    Ok(len)
}

/// Append the encoding of an arbitrary-precision decimal to `out`.
///
/// # Errors
///
/// Returns [`EncodeError::ExponentOutOfRange`] if the exponent magnitude
/// exceeds [`MAX_EXPONENT_MAGNITUDE`]. Nothing is appended in that case.
pub fn encode_big_to_vec(value: &BigDecimal, out: &mut Vec<u8>) -> EncodeResult<usize> {
    let negative = value.is_negative();
    let special = match value.form() {
        Form::Infinite if negative => Some(SpecialValue::NegativeInfinity),
        Form::Infinite => Some(SpecialValue::Infinity),
        Form::NaN => Some(SpecialValue::QuietNaN),
        Form::NaNSignaling => Some(SpecialValue::SignalingNaN),
        Form::Finite if value.is_zero() && negative => Some(SpecialValue::NegativeZero),
        Form::Finite => None,
    };
    if let Some(special) = special {
        let bytes = special_bytes(special);
        out.extend_from_slice(bytes);
        return Ok(bytes.len());
    }
    if value.is_zero() {
        out.extend_from_slice(&POSITIVE_ZERO);
        return Ok(POSITIVE_ZERO.len());
    }

    let exponent = value.exponent();
    let magnitude = exponent.unsigned_abs();
    if magnitude > MAX_EXPONENT_MAGNITUDE {
        return Err(EncodeError::ExponentOutOfRange(exponent));
    }

    let start = out.len();
    let mut scratch = [0u8; varint::MAX_U64_LEN];
    let len = varint::write_u64(header(exponent < 0, magnitude, negative), &mut scratch);
    out.extend_from_slice(&scratch[..len]);
    write_coefficient(value.coefficient(), out);
    Ok(out.len() - start)
}

fn write_coefficient(coefficient: &BigUint, out: &mut Vec<u8>) {
    if let Some(word) = coefficient.to_u64() {
        let mut scratch = [0u8; varint::MAX_U64_LEN];
        let len = varint::write_u64(word, &mut scratch);
        out.extend_from_slice(&scratch[..len]);
    } else {
        varint::write_big(coefficient, out);
    }
}

/// Encode an arbitrary-precision decimal into the start of `buffer`.
///
/// # Errors
///
/// Returns [`EncodeError::ExponentOutOfRange`] for an exponent that cannot be
/// carried, or [`EncodeError::BufferTooSmall`] if `buffer` is too short.
pub fn encode_big_to_slice(value: &BigDecimal, buffer: &mut [u8]) -> EncodeResult<usize> {
    let mut scratch = Vec::with_capacity(max_encode_length_big(value));
    let len = encode_big_to_vec(value, &mut scratch)?;
    let Some(target) = buffer.get_mut(..len) else {
        return Err(EncodeError::BufferTooSmall {
            required: len,
            available: buffer.len(),
        });
    };
    target.copy_from_slice(&scratch);
    Ok(len)
}

/// Write the encoding of an arbitrary-precision decimal to `writer`.
///
/// # Errors
///
/// Returns [`EncodeError::ExponentOutOfRange`] for an exponent that cannot be
/// carried, or [`EncodeError::Io`] if the writer fails.
pub fn encode_big(value: &BigDecimal, writer: &mut impl io::Write) -> EncodeResult<usize> {
    let mut scratch = Vec::with_capacity(max_encode_length_big(value));
    let len = encode_big_to_vec(value, &mut scratch)?;
    writer.write_all(&scratch)?;
    Ok(len)
}
