//! The fixed-width decimal value model
//!
//! Construction paths round half-to-even and report it through
//! [`Conversion`]; every one of them returns a minimized value.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use tracing::trace;

use crate::big::{BigDecimal, Form, Format};
use crate::encoder::{encode_to_vec, max_encode_length};
use crate::error::{Conversion, ConversionError, ConversionResult, ParseError, ParseResult};
use crate::parse::{lex, round_significand, Digits, Literal};

/// Exponent value marking a [`DFloat`] as special. The coefficient then holds
/// a [`SpecialValue`] tag instead of a number.
pub const EXP_SPECIAL: i32 = i32::MIN;

/// Quiet bit of an IEEE-754 binary64 NaN (top bit of the fraction field).
const F64_QUIET_BIT: u64 = 1 << 51;
const F64_QUIET_NAN: u64 = 0x7ff8_0000_0000_0000;
const F64_SIGNALING_NAN: u64 = 0x7ff4_0000_0000_0000;

const F32_QUIET_BIT: u32 = 1 << 22;
const F32_QUIET_NAN: u32 = 0x7fc0_0000;
const F32_SIGNALING_NAN: u32 = 0x7fa0_0000;

/// Powers of ten that fit a `u64`, indexed by exponent.
const POWERS_OF_TEN: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// Special decimal values, keyed by their coefficient tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialValue {
    NegativeZero = 0,
    Infinity = 1,
    QuietNaN = 2,
    NegativeInfinity = 5,
    SignalingNaN = 6,
}

impl SpecialValue {
    /// The coefficient stored alongside [`EXP_SPECIAL`].
    #[must_use]
    pub const fn tag(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub const fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            0 => Some(Self::NegativeZero),
            1 => Some(Self::Infinity),
            2 => Some(Self::QuietNaN),
            5 => Some(Self::NegativeInfinity),
            6 => Some(Self::SignalingNaN),
            _ => None,
        }
    }
}

/// A decimal floating-point value in 96 bits: value = coefficient × 10^exponent.
///
/// The coefficient is any `i64` except `i64::MIN`; the exponent is any `i32`
/// except [`EXP_SPECIAL`], which marks the special values (negative zero,
/// infinities and NaNs). Positive zero is the ordinary value `0 × 10^0`.
///
/// Values built through the public constructors are minimized: the
/// coefficient has no trailing decimal zero, and zero has exponent 0. Equality
/// is structural, so minimized values compare equal exactly when they are
/// numerically equal. Values read back by the wire decoder keep whatever
/// coefficient/exponent pair was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DFloat {
    exponent: i32,
    coefficient: i64,
}

impl Default for DFloat {
    fn default() -> Self {
        Self::ZERO
    }
}

impl DFloat {
    pub const ZERO: Self = Self::from_parts(0, 0);
    pub const NEGATIVE_ZERO: Self = Self::from_special(SpecialValue::NegativeZero);
    pub const INFINITY: Self = Self::from_special(SpecialValue::Infinity);
    pub const NEGATIVE_INFINITY: Self = Self::from_special(SpecialValue::NegativeInfinity);
    pub const NAN: Self = Self::from_special(SpecialValue::QuietNaN);
    pub const SIGNALING_NAN: Self = Self::from_special(SpecialValue::SignalingNaN);

    /// Create a minimized value from an exponent and a coefficient.
    ///
    /// # Panics
    ///
    /// Panics if `exponent` is [`EXP_SPECIAL`], if `coefficient` is `i64::MIN`,
    /// or if stripping trailing zeros would push the exponent past `i32::MAX`.
    /// Use [`checked_new`](Self::checked_new) to handle those inputs.
    #[must_use]
    pub fn new(exponent: i32, coefficient: i64) -> Self {
        match Self::checked_new(exponent, coefficient) {
            Some(value) => value,
            None => panic!("({exponent}, {coefficient}) is not a valid DFloat exponent/coefficient"),
        }
    }

    /// Create a minimized value, or `None` if `exponent` is [`EXP_SPECIAL`],
    /// `coefficient` is `i64::MIN`, or the minimized exponent would exceed
    /// `i32::MAX` (e.g. `10 × 10^i32::MAX`).
    #[must_use]
    pub fn checked_new(exponent: i32, coefficient: i64) -> Option<Self> {
        if exponent == EXP_SPECIAL || coefficient == i64::MIN {
            return None;
        }
        Self::from_wide(coefficient < 0, coefficient.unsigned_abs(), i64::from(exponent))
    }

    #[must_use]
    pub const fn from_special(value: SpecialValue) -> Self {
        Self::from_parts(EXP_SPECIAL, value.tag())
    }

    /// Build without minimizing. The caller upholds the type's invariants.
    pub(crate) const fn from_parts(exponent: i32, coefficient: i64) -> Self {
        Self {
            exponent,
            coefficient,
        }
    }

    /// Build a minimized finite value from a magnitude and a wide exponent.
    ///
    /// Returns `None` if the minimized exponent does not fit.
    fn from_wide(negative: bool, mut magnitude: u64, mut exponent: i64) -> Option<Self> {
        if magnitude == 0 {
            return Some(if negative {
                Self::NEGATIVE_ZERO
            } else {
                Self::ZERO
            });
        }
        while magnitude % 10 == 0 {
            magnitude /= 10;
            exponent += 1;
        }
        let exponent = i32::try_from(exponent)
            .ok()
            .filter(|&e| e != EXP_SPECIAL)?;
        let coefficient = i64::try_from(magnitude).ok()?;
        Some(Self::from_parts(
            exponent,
            if negative { -coefficient } else { coefficient },
        ))
    }

    #[must_use]
    pub const fn exponent(self) -> i32 {
        self.exponent
    }

    #[must_use]
    pub const fn coefficient(self) -> i64 {
        self.coefficient
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Parse a decimal literal, rounding half-to-even to fit the coefficient.
    ///
    /// Accepts an optional sign, digits with an optional fractional part, and
    /// an optional `e`/`E` exponent. The keywords `inf`/`infinity` (optionally
    /// signed), `nan` and `snan` are matched case-insensitively. An empty
    /// string is positive zero.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for malformed text, a signed NaN, or an exponent
    /// that does not fit.
    pub fn parse(text: &str) -> ParseResult<Conversion<Self>> {
        Self::parse_with_digits(text, 0)
    }

    /// Parse a decimal literal keeping at most `significant_digits` digits.
    ///
    /// A `significant_digits` of 0 or less keeps as many digits as the
    /// coefficient can hold.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_with_digits(text: &str, significant_digits: i32) -> ParseResult<Conversion<Self>> {
        let digits = match lex(text)? {
            Literal::Infinity { negative: false } => return Ok(Conversion::exact_value(Self::INFINITY)),
            Literal::Infinity { negative: true } => {
                return Ok(Conversion::exact_value(Self::NEGATIVE_INFINITY))
            }
            Literal::NaN { signaling: false } => return Ok(Conversion::exact_value(Self::NAN)),
            Literal::NaN { signaling: true } => return Ok(Conversion::exact_value(Self::SIGNALING_NAN)),
            Literal::Number(digits) => digits,
        };

        let significand = round_significand(&digits, significant_digits);
        let value = Self::from_wide(digits.negative, significand.magnitude, significand.exponent)
            .ok_or(ParseError::ExponentOutOfRange)?;

        if significand.rounded {
            trace!(text, significant_digits, %value, "rounded decimal literal");
            Ok(Conversion::rounded_value(value))
        } else {
            Ok(Conversion::exact_value(value))
        }
    }

    /// Convert a binary float, keeping at most `significant_digits` digits
    /// (0 or less keeps them all).
    ///
    /// Finite values go through the shortest decimal string that round-trips
    /// to `value`, then are rounded half-to-even. Signed zeros, infinities and
    /// quiet/signaling NaNs map to the matching special values.
    pub fn from_f64(value: f64, significant_digits: i32) -> Conversion<Self> {
        if value == 0.0 {
            return Conversion::exact_value(Self::signed_zero(value.is_sign_negative()));
        }
        if value.is_infinite() {
            return Conversion::exact_value(Self::signed_infinity(value.is_sign_negative()));
        }
        if value.is_nan() {
            let quiet = value.to_bits() & F64_QUIET_BIT != 0;
            return Conversion::exact_value(if quiet { Self::NAN } else { Self::SIGNALING_NAN });
        }

        let mut buf = StackBuf::new();
        write!(buf, "{value:e}").expect("f64 scientific form should fit in the stack buffer");
        Self::parse_float_text(buf.as_str(), significant_digits)
    }

    /// Convert an [`f32`] using its own shortest representation.
    pub fn from_f32(value: f32, significant_digits: i32) -> Conversion<Self> {
        if value == 0.0 {
            return Conversion::exact_value(Self::signed_zero(value.is_sign_negative()));
        }
        if value.is_infinite() {
            return Conversion::exact_value(Self::signed_infinity(value.is_sign_negative()));
        }
        if value.is_nan() {
            let quiet = value.to_bits() & F32_QUIET_BIT != 0;
            return Conversion::exact_value(if quiet { Self::NAN } else { Self::SIGNALING_NAN });
        }

        let mut buf = StackBuf::new();
        write!(buf, "{value:e}").expect("f32 scientific form should fit in the stack buffer");
        Self::parse_float_text(buf.as_str(), significant_digits)
    }

    fn parse_float_text(text: &str, significant_digits: i32) -> Conversion<Self> {
        Self::parse_with_digits(text, significant_digits)
            .expect("float scientific form should always be a valid decimal")
    }

    /// Convert an unsigned integer. Values above `i64::MAX` lose their last
    /// digit, rounded half-to-even.
    pub fn from_u64(value: u64) -> Conversion<Self> {
        match i64::try_from(value) {
            Ok(v) => Conversion::exact_value(Self::from_parts(0, v).minimized()),
            Err(_) => Self::from_wide_magnitude(false, value),
        }
    }

    /// Convert a signed integer. Only `i64::MIN` needs rounding.
    pub fn from_i64(value: i64) -> Conversion<Self> {
        if value == i64::MIN {
            return Self::from_wide_magnitude(true, value.unsigned_abs());
        }
        Conversion::exact_value(Self::from_parts(0, value).minimized())
    }

    /// Drop the last digit of a magnitude that does not fit an `i64`.
    fn from_wide_magnitude(negative: bool, magnitude: u64) -> Conversion<Self> {
        let remainder = magnitude % 10;
        let mut quotient = magnitude / 10;
        if remainder > 5 || (remainder == 5 && quotient & 1 == 1) {
            quotient += 1;
        }
        #[allow(clippy::cast_possible_wrap)]
        let coefficient = quotient as i64;
        let value = Self::from_parts(1, if negative { -coefficient } else { coefficient })
            .minimized();
        if remainder == 0 {
            Conversion::exact_value(value)
        } else {
            trace!(magnitude, negative, %value, "rounded integer");
            Conversion::rounded_value(value)
        }
    }

    /// Convert an arbitrary-precision integer, rounding half-to-even if it
    /// has more digits than the coefficient can hold.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ExponentOutOfRange`] if the integer has so
    /// many digits that the exponent overflows.
    pub fn from_big_int(value: &BigInt) -> ConversionResult<Conversion<Self>> {
        if let Some(v) = value.to_i64() {
            return Ok(Self::from_i64(v));
        }
        if let Some(v) = value.to_u64() {
            return Ok(Self::from_u64(v));
        }
        Self::from_big_decimal(&BigDecimal::new(value.clone(), 0))
    }

    /// Convert an arbitrary-precision decimal.
    ///
    /// Coefficients up to `i64::MAX` convert exactly. Larger ones are rounded
    /// half-to-even from their decimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::ExponentOutOfRange`] if the (rounded)
    /// exponent cannot be held by a [`DFloat`].
    pub fn from_big_decimal(value: &BigDecimal) -> ConversionResult<Conversion<Self>> {
        let negative = value.is_negative();
        match value.form() {
            Form::Infinite => return Ok(Conversion::exact_value(Self::signed_infinity(negative))),
            Form::NaN => return Ok(Conversion::exact_value(Self::NAN)),
            Form::NaNSignaling => return Ok(Conversion::exact_value(Self::SIGNALING_NAN)),
            Form::Finite => {}
        }

        let exponent = i64::from(value.exponent());
        if let Some(magnitude) = value.coefficient().to_i64() {
            #[allow(clippy::cast_sign_loss)]
            let magnitude = magnitude as u64;
            return Self::from_wide(negative, magnitude, exponent)
                .map(Conversion::exact_value)
                .ok_or(ConversionError::ExponentOutOfRange(exponent));
        }

        let coefficient_digits = value.coefficient().to_str_radix(10);
        let digits = Digits {
            negative,
            integer: &coefficient_digits,
            fraction: "",
            exponent,
        };
        let significand = round_significand(&digits, 0);
        let result = Self::from_wide(negative, significand.magnitude, significand.exponent)
            .ok_or(ConversionError::ExponentOutOfRange(significand.exponent))?;

        if significand.rounded {
            trace!(%value, %result, "rounded arbitrary-precision decimal");
            Ok(Conversion::rounded_value(result))
        } else {
            Ok(Conversion::exact_value(result))
        }
    }

    const fn signed_zero(negative: bool) -> Self {
        if negative {
            Self::NEGATIVE_ZERO
        } else {
            Self::ZERO
        }
    }

    const fn signed_infinity(negative: bool) -> Self {
        if negative {
            Self::NEGATIVE_INFINITY
        } else {
            Self::INFINITY
        }
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[must_use]
    pub const fn is_special(self) -> bool {
        self.exponent == EXP_SPECIAL
    }

    /// True for positive and negative zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.coefficient == 0
    }

    #[must_use]
    pub const fn is_negative_zero(self) -> bool {
        self.exponent == EXP_SPECIAL && self.coefficient == SpecialValue::NegativeZero.tag()
    }

    /// True for positive and negative infinity.
    #[must_use]
    pub const fn is_infinity(self) -> bool {
        self.is_special() && self.coefficient & SpecialValue::Infinity.tag() != 0
    }

    #[must_use]
    pub const fn is_negative_infinity(self) -> bool {
        self.exponent == EXP_SPECIAL && self.coefficient == SpecialValue::NegativeInfinity.tag()
    }

    /// True for quiet and signaling NaN.
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.is_special() && self.coefficient & SpecialValue::QuietNaN.tag() != 0
    }

    #[must_use]
    pub const fn is_signaling_nan(self) -> bool {
        self.exponent == EXP_SPECIAL && self.coefficient == SpecialValue::SignalingNaN.tag()
    }

    /// True for zeros and ordinary numbers.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        !self.is_infinity() && !self.is_nan()
    }

    /// The special value this represents, or `None` for ordinary numbers and
    /// positive zero.
    ///
    /// # Panics
    ///
    /// Panics if the value carries [`EXP_SPECIAL`] with an unknown tag, which
    /// no public constructor produces.
    #[must_use]
    pub fn special(self) -> Option<SpecialValue> {
        if !self.is_special() {
            return None;
        }
        match SpecialValue::from_tag(self.coefficient) {
            Some(special) => Some(special),
            None => panic!("{}: Illegal special coefficient", self.coefficient),
        }
    }

    // =========================================================================
    // Conversion out
    // =========================================================================

    /// Convert to the nearest [`f64`] (round-half-to-even).
    ///
    /// Special values map to their bit-exact IEEE-754 counterparts; a
    /// signaling NaN has the quiet bit clear and a non-zero payload.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        if let Some(special) = self.special() {
            return match special {
                SpecialValue::NegativeZero => -0.0,
                SpecialValue::Infinity => f64::INFINITY,
                SpecialValue::NegativeInfinity => f64::NEG_INFINITY,
                SpecialValue::QuietNaN => f64::from_bits(F64_QUIET_NAN),
                SpecialValue::SignalingNaN => f64::from_bits(F64_SIGNALING_NAN),
            };
        }

        let mut buf = StackBuf::new();
        write!(buf, "{}e{}", self.coefficient, self.exponent)
            .expect("DFloat scientific form should fit in the stack buffer");
        buf.as_str()
            .parse()
            .expect("DFloat scientific form should always parse as f64")
    }

    /// Convert to the nearest [`f32`] (round-half-to-even).
    #[must_use]
    pub fn to_f32(self) -> f32 {
        if let Some(special) = self.special() {
            return match special {
                SpecialValue::NegativeZero => -0.0,
                SpecialValue::Infinity => f32::INFINITY,
                SpecialValue::NegativeInfinity => f32::NEG_INFINITY,
                SpecialValue::QuietNaN => f32::from_bits(F32_QUIET_NAN),
                SpecialValue::SignalingNaN => f32::from_bits(F32_SIGNALING_NAN),
            };
        }

        let mut buf = StackBuf::new();
        write!(buf, "{}e{}", self.coefficient, self.exponent)
            .expect("DFloat scientific form should fit in the stack buffer");
        buf.as_str()
            .parse()
            .expect("DFloat scientific form should always parse as f32")
    }

    /// Convert to an [`i64`].
    ///
    /// # Errors
    ///
    /// Fails if the value is not a whole number, is infinite or NaN, or does
    /// not fit.
    pub fn to_i64(self) -> ConversionResult<i64> {
        let (coefficient, multiplier) = self.whole_parts()?;
        i64::try_from(multiplier)
            .ok()
            .and_then(|m| coefficient.checked_mul(m))
            .ok_or_else(|| self.overflow("i64"))
    }

    /// Convert to a [`u64`].
    ///
    /// # Errors
    ///
    /// Fails if the value is negative, is not a whole number, is infinite or
    /// NaN, or does not fit.
    pub fn to_u64(self) -> ConversionResult<u64> {
        let (coefficient, multiplier) = self.whole_parts()?;
        let coefficient =
            u64::try_from(coefficient).map_err(|_| ConversionError::Negative(self.to_string()))?;
        coefficient
            .checked_mul(multiplier)
            .ok_or_else(|| self.overflow("u64"))
    }

    /// Coefficient and the power of ten it must be scaled by.
    fn whole_parts(self) -> ConversionResult<(i64, u64)> {
        if self.is_zero() {
            return Ok((0, 1));
        }
        if self.is_special() {
            return Err(ConversionError::NotFinite(self.to_string()));
        }
        if self.exponent < 0 {
            return Err(ConversionError::NotWholeNumber(self.to_string()));
        }
        #[allow(clippy::cast_sign_loss)]
        let multiplier = POWERS_OF_TEN
            .get(self.exponent as usize)
            .copied()
            .ok_or_else(|| self.overflow("u64"))?;
        Ok((self.coefficient, multiplier))
    }

    fn overflow(self, target: &'static str) -> ConversionError {
        ConversionError::Overflow {
            value: self.to_string(),
            target,
        }
    }

    /// Convert to an arbitrary-precision integer. Always exact.
    ///
    /// # Errors
    ///
    /// Fails if the value is not a whole number, or is infinite or NaN.
    pub fn to_big_int(self) -> ConversionResult<BigInt> {
        if self.is_zero() {
            return Ok(BigInt::ZERO);
        }
        if self.is_special() {
            return Err(ConversionError::NotFinite(self.to_string()));
        }
        let Ok(exponent) = u32::try_from(self.exponent) else {
            return Err(ConversionError::NotWholeNumber(self.to_string()));
        };
        Ok(BigInt::from(self.coefficient) * BigInt::from(10u32).pow(exponent))
    }

    /// Convert to an arbitrary-precision decimal. Never loses information.
    #[must_use]
    pub fn to_big_decimal(self) -> BigDecimal {
        match self.special() {
            Some(SpecialValue::NegativeZero) => BigDecimal::zero(true),
            Some(SpecialValue::Infinity) => BigDecimal::infinity(false),
            Some(SpecialValue::NegativeInfinity) => BigDecimal::infinity(true),
            Some(SpecialValue::QuietNaN) => BigDecimal::nan(),
            Some(SpecialValue::SignalingNaN) => BigDecimal::signaling_nan(),
            None => BigDecimal::new(BigInt::from(self.coefficient), self.exponent),
        }
    }

    /// Render as text. See [`BigDecimal::text`] for the format characters.
    #[must_use]
    pub fn text(self, format: char) -> String {
        self.to_big_decimal().text(format)
    }

    #[must_use]
    pub fn to_text(self, format: Format) -> String {
        self.to_big_decimal().to_text(format)
    }

    /// Encode into a freshly allocated buffer.
    #[must_use]
    pub fn to_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(max_encode_length());
        encode_to_vec(self, &mut out);
        out
    }

    /// Strip trailing decimal zeros from the coefficient into the exponent.
    ///
    /// Only for values built at exponent 0 or 1, which always leave room for
    /// the at most 18 stripped zeros.
    const fn minimized(self) -> Self {
        if self.exponent == EXP_SPECIAL {
            return self;
        }
        if self.coefficient == 0 {
            return Self::ZERO;
        }
        let mut d = self;
        while d.coefficient % 10 == 0 {
            d.coefficient /= 10;
            d.exponent += 1;
        }
        d
    }
}

impl FromStr for DFloat {
    type Err = ParseError;

    /// Parse a decimal literal. Rounding is applied silently; use
    /// [`DFloat::parse`] to find out whether digits were lost.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map(Conversion::into_value)
    }
}

impl fmt::Display for DFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(Format::General))
    }
}

impl From<DFloat> for BigDecimal {
    fn from(value: DFloat) -> Self {
        value.to_big_decimal()
    }
}

// Narrow integer types always fit the coefficient.
impl From<u8> for DFloat {
    fn from(value: u8) -> Self {
        Self::from(i32::from(value))
    }
}

impl From<u16> for DFloat {
    fn from(value: u16) -> Self {
        Self::from(i32::from(value))
    }
}

impl From<u32> for DFloat {
    fn from(value: u32) -> Self {
        Self::from_parts(0, i64::from(value)).minimized()
    }
}

impl From<i8> for DFloat {
    fn from(value: i8) -> Self {
        Self::from(i32::from(value))
    }
}

impl From<i16> for DFloat {
    fn from(value: i16) -> Self {
        Self::from(i32::from(value))
    }
}

impl From<i32> for DFloat {
    fn from(value: i32) -> Self {
        Self::from_parts(0, i64::from(value)).minimized()
    }
}

/// Fixed-capacity stack buffer that implements `fmt::Write`.
///
/// Holds the scientific form of a float, or of a [`DFloat`] on its way to
/// the float parser, without touching the heap. The longest such string is
/// `-9223372036854775807e-2147483647` (32 bytes).
struct StackBuf {
    buf: [u8; 40],
    len: usize,
}

impl StackBuf {
    const fn new() -> Self {
        Self {
            buf: [0; 40],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl fmt::Write for StackBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let new_len = self.len + bytes.len();
        if new_len > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..new_len].copy_from_slice(bytes);
        self.len = new_len;
        Ok(())
    }
}
