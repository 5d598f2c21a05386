//! Arbitrary-precision decimal values.
//!
//! [`BigDecimal`] is the interchange type for values whose coefficient does not
//! fit a [`DFloat`](crate::DFloat). It stores an unbounded magnitude, an `i32`
//! exponent, a sign flag and a [`Form`] for the non-finite values:
//! value = (-1)^negative × coefficient × 10^exponent.

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::Zero;

use crate::error::{ParseError, ParseResult};
use crate::parse::{lex, Literal};

/// Kind of value held by a [`BigDecimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    Finite,
    Infinite,
    NaN,
    NaNSignaling,
}

/// Output styles understood by [`BigDecimal::text`] and [`DFloat::text`](crate::DFloat::text).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `e`: `-d.ddde±x`
    Scientific,
    /// `E`: `-d.dddE±x`
    ScientificUpper,
    /// `f`: `-ddd.ddd`, no exponent
    Plain,
    /// `g`: plain for moderate exponents, `e` otherwise
    General,
    /// `G`: plain for moderate exponents, `E` otherwise
    GeneralUpper,
}

impl Format {
    /// Map a format character (`e`, `E`, `f`, `g`, `G`) to a [`Format`].
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'e' => Some(Self::Scientific),
            'E' => Some(Self::ScientificUpper),
            'f' => Some(Self::Plain),
            'g' => Some(Self::General),
            'G' => Some(Self::GeneralUpper),
            _ => None,
        }
    }
}

/// Smallest adjusted exponent that `g`/`G` still render without an exponent.
const ADJUSTED_EXPONENT_LIMIT: i64 = -6;

/// An arbitrary-precision decimal floating-point value.
///
/// Derived equality is structural: `1.0` (coefficient 10, exponent -1) and `1`
/// are different values under `==`. Use [`value_eq`](Self::value_eq) to
/// compare by numeric value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    negative: bool,
    coefficient: BigUint,
    exponent: i32,
    form: Form,
}

impl BigDecimal {
    /// Create a finite value from a signed coefficient and an exponent.
    #[must_use]
    pub fn new(coefficient: BigInt, exponent: i32) -> Self {
        let (sign, magnitude) = coefficient.into_parts();
        Self::from_parts(sign == Sign::Minus, magnitude, exponent)
    }

    /// Create a finite value from its sign, magnitude and exponent.
    #[must_use]
    pub const fn from_parts(negative: bool, coefficient: BigUint, exponent: i32) -> Self {
        Self {
            negative,
            coefficient,
            exponent,
            form: Form::Finite,
        }
    }

    #[must_use]
    pub const fn zero(negative: bool) -> Self {
        Self::from_parts(negative, BigUint::ZERO, 0)
    }

    #[must_use]
    pub const fn infinity(negative: bool) -> Self {
        Self::special(negative, Form::Infinite)
    }

    #[must_use]
    pub const fn nan() -> Self {
        Self::special(false, Form::NaN)
    }

    #[must_use]
    pub const fn signaling_nan() -> Self {
        Self::special(false, Form::NaNSignaling)
    }

    const fn special(negative: bool, form: Form) -> Self {
        Self {
            negative,
            coefficient: BigUint::ZERO,
            exponent: 0,
            form,
        }
    }

    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    /// Magnitude of the coefficient. Zero for non-finite values.
    #[must_use]
    pub const fn coefficient(&self) -> &BigUint {
        &self.coefficient
    }

    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    #[must_use]
    pub const fn form(&self) -> Form {
        self.form
    }

    /// The coefficient with the sign applied.
    #[must_use]
    pub fn signed_coefficient(&self) -> BigInt {
        let sign = if self.negative { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(sign, self.coefficient.clone())
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.form == Form::Finite && self.coefficient.is_zero()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.form == Form::Finite
    }

    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.form == Form::Infinite
    }

    /// True for both quiet and signaling NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self.form, Form::NaN | Form::NaNSignaling)
    }

    /// Compare by decimal value.
    ///
    /// Trailing zeros are ignored, +0 equals -0, and two non-finite values are
    /// equal when they share form and (for infinities) sign.
    #[must_use]
    pub fn value_eq(&self, other: &Self) -> bool {
        match (self.form, other.form) {
            (Form::Finite, Form::Finite) => {
                if self.is_zero() || other.is_zero() {
                    return self.is_zero() && other.is_zero();
                }
                self.negative == other.negative && self.stripped() == other.stripped()
            }
            (Form::Infinite, Form::Infinite) => self.negative == other.negative,
            (a, b) => a == b,
        }
    }

    /// Coefficient and exponent with trailing decimal zeros removed.
    fn stripped(&self) -> (BigUint, i64) {
        let ten = BigUint::from(10u32);
        let mut coefficient = self.coefficient.clone();
        let mut exponent = i64::from(self.exponent);
        while !coefficient.is_zero() {
            let (quotient, remainder) = coefficient.div_rem(&ten);
            if !remainder.is_zero() {
                break;
            }
            coefficient = quotient;
            exponent += 1;
        }
        (coefficient, exponent)
    }

    /// Render this value as text in the given format.
    ///
    /// Accepts the format characters of [`Format::from_char`]. Any other
    /// character yields `%` followed by that character. The `f` format writes
    /// the exponent out literally, so it may show zeros that are not part of
    /// the coefficient.
    #[must_use]
    pub fn text(&self, format: char) -> String {
        match Format::from_char(format) {
            Some(f) => self.to_text(f),
            None => format!("%{format}"),
        }
    }

    /// Render this value as text in the given format.
    #[must_use]
    pub fn to_text(&self, format: Format) -> String {
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        match self.form {
            Form::Finite => {}
            Form::Infinite => {
                out.push_str("Infinity");
                return out;
            }
            Form::NaN => {
                out.push_str("NaN");
                return out;
            }
            Form::NaNSignaling => {
                out.push_str("sNaN");
                return out;
            }
        }

        let digits = self.coefficient.to_str_radix(10);
        if self.exponent == 0 && self.coefficient.is_zero() {
            out.push('0');
            return out;
        }

        match format {
            Format::Scientific => write_scientific(&mut out, 'e', &digits, self.exponent),
            Format::ScientificUpper => write_scientific(&mut out, 'E', &digits, self.exponent),
            Format::Plain => write_plain(&mut out, &digits, self.exponent),
            Format::General | Format::GeneralUpper => {
                #[allow(clippy::cast_possible_wrap)]
                let adjusted = i64::from(self.exponent) + digits.len() as i64 - 1;
                if self.exponent <= 0 && adjusted >= ADJUSTED_EXPONENT_LIMIT {
                    write_plain(&mut out, &digits, self.exponent);
                } else {
                    let marker = if format == Format::General { 'e' } else { 'E' };
                    write_scientific(&mut out, marker, &digits, self.exponent);
                }
            }
        }
        out
    }
}

/// `d.ddd` followed by the marker and a signed adjusted exponent.
fn write_scientific(out: &mut String, marker: char, digits: &str, exponent: i32) {
    #[allow(clippy::cast_possible_wrap)]
    let adjusted = i64::from(exponent) + digits.len() as i64 - 1;
    let (first, rest) = digits.split_at(1);
    out.push_str(first);
    if !rest.is_empty() {
        out.push('.');
        out.push_str(rest);
    }
    out.push(marker);
    out.push(if adjusted < 0 { '-' } else { '+' });
    out.push_str(&adjusted.unsigned_abs().to_string());
}

fn write_plain(out: &mut String, digits: &str, exponent: i32) {
    if exponent >= 0 {
        out.push_str(digits);
        out.extend(std::iter::repeat('0').take(exponent.unsigned_abs() as usize));
        return;
    }

    let fraction_len = exponent.unsigned_abs() as usize;
    if fraction_len >= digits.len() {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(fraction_len - digits.len()));
        out.push_str(digits);
    } else {
        let (integer, fraction) = digits.split_at(digits.len() - fraction_len);
        out.push_str(integer);
        out.push('.');
        out.push_str(fraction);
    }
}

impl FromStr for BigDecimal {
    type Err = ParseError;

    /// Parse a decimal literal exactly, keeping every digit.
    fn from_str(s: &str) -> ParseResult<Self> {
        let digits = match lex(s)? {
            Literal::Infinity { negative } => return Ok(Self::infinity(negative)),
            Literal::NaN { signaling: false } => return Ok(Self::nan()),
            Literal::NaN { signaling: true } => return Ok(Self::signaling_nan()),
            Literal::Number(digits) => digits,
        };

        let exponent =
            i32::try_from(digits.scale()).map_err(|_| ParseError::ExponentOutOfRange)?;

        let mut buf = String::with_capacity(digits.integer.len() + digits.fraction.len());
        buf.push_str(digits.integer);
        buf.push_str(digits.fraction);
        let coefficient = if buf.is_empty() {
            BigUint::ZERO
        } else {
            BigUint::parse_bytes(buf.as_bytes(), 10).ok_or(ParseError::NoDigits)?
        };

        Ok(Self::from_parts(digits.negative, coefficient, exponent))
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(Format::GeneralUpper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_finite() {
        let d = big("-12.50e+3");
        assert!(d.is_negative());
        assert_eq!(d.coefficient(), &BigUint::from(1250u32));
        assert_eq!(d.exponent(), 1);
        assert_eq!(d.form(), Form::Finite);
    }

    #[test]
    fn test_parse_keeps_every_digit() {
        let d = big("9.4452837206285466345998345667683453466347345e-5000");
        assert_eq!(
            d.coefficient().to_str_radix(10),
            "94452837206285466345998345667683453466347345"
        );
        assert_eq!(d.exponent(), -5043);
    }

    #[test]
    fn test_parse_specials() {
        assert_eq!(big("inf"), BigDecimal::infinity(false));
        assert_eq!(big("-Infinity"), BigDecimal::infinity(true));
        assert_eq!(big("nan"), BigDecimal::nan());
        assert_eq!(big("snan"), BigDecimal::signaling_nan());
        assert_eq!(big("-0"), BigDecimal::zero(true));
        assert!("-nan".parse::<BigDecimal>().is_err());
    }

    #[test]
    fn test_parse_exponent_range() {
        assert_eq!(
            "1e-2147483647".parse::<BigDecimal>().map(|d| d.exponent()),
            Ok(-2_147_483_647)
        );
        assert_eq!(
            "0.01e-2147483647".parse::<BigDecimal>(),
            Err(ParseError::ExponentOutOfRange)
        );
    }

    #[test]
    fn test_new_splits_sign() {
        let d = BigDecimal::new(BigInt::from(-105_833), 100);
        assert!(d.is_negative());
        assert_eq!(d.coefficient(), &BigUint::from(105_833u32));
        assert_eq!(d.signed_coefficient(), BigInt::from(-105_833));
    }

    #[test]
    fn test_text_formats() {
        let d = big("123.45678901234");
        assert_eq!(d.text('e'), "1.2345678901234e+2");
        assert_eq!(d.text('E'), "1.2345678901234E+2");
        assert_eq!(d.text('f'), "123.45678901234");
        assert_eq!(d.text('g'), "123.45678901234");
        assert_eq!(d.text('G'), "123.45678901234");
    }

    #[test]
    fn test_text_large_exponent() {
        let d = big("1.2345678901234e+100");
        assert_eq!(d.text('g'), "1.2345678901234e+100");
        assert_eq!(d.text('G'), "1.2345678901234E+100");
        assert_eq!(big("1e3").text('f'), "1000");
    }

    #[test]
    fn test_text_small_magnitudes() {
        assert_eq!(big("0.0000012").text('g'), "0.0000012");
        assert_eq!(big("0.00000012").text('g'), "1.2e-7");
        assert_eq!(big("0.00000012").text('f'), "0.00000012");
        assert_eq!(big("-0.5").text('e'), "-5e-1");
    }

    #[test]
    fn test_text_zero_and_specials() {
        for format in ['e', 'E', 'f', 'g', 'G'] {
            assert_eq!(BigDecimal::zero(true).text(format), "-0");
            assert_eq!(BigDecimal::zero(false).text(format), "0");
        }
        assert_eq!(BigDecimal::infinity(true).text('g'), "-Infinity");
        assert_eq!(BigDecimal::nan().text('g'), "NaN");
        assert_eq!(BigDecimal::signaling_nan().text('g'), "sNaN");
    }

    #[test]
    fn test_text_unknown_format() {
        assert_eq!(big("1.5").text('x'), "%x");
    }

    #[test]
    fn test_display_uses_upper_general() {
        let d = big("-9.4452837206285466345998345667683453466347345e-5000");
        assert_eq!(
            d.to_string(),
            "-9.4452837206285466345998345667683453466347345E-5000"
        );
    }

    #[test]
    fn test_value_eq() {
        assert!(big("1.50").value_eq(&big("1.5")));
        assert!(big("100").value_eq(&big("1e2")));
        assert!(big("0").value_eq(&big("-0.000")));
        assert!(!big("1.5").value_eq(&big("-1.5")));
        assert!(!big("1.5").value_eq(&big("1.6")));
        assert!(big("-inf").value_eq(&big("-inf")));
        assert!(!big("inf").value_eq(&big("-inf")));
        assert!(!big("nan").value_eq(&big("snan")));
    }
}
