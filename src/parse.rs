//! Decimal literal lexing, shared by [`DFloat`](crate::DFloat) and
//! [`BigDecimal`](crate::BigDecimal), and the half-to-even rounding used when
//! a literal has more digits than an `i64` coefficient can hold.

use crate::error::{ParseError, ParseResult};

/// Largest explicit exponent accepted in a literal.
const EXPONENT_CAP: i64 = i32::MAX as i64;

/// Largest coefficient with `n` digits, indexed by `n`.
const DIGITS_MAX: [u64; 19] = [
    0,
    9,
    99,
    999,
    9_999,
    99_999,
    999_999,
    9_999_999,
    99_999_999,
    999_999_999,
    9_999_999_999,
    99_999_999_999,
    999_999_999_999,
    9_999_999_999_999,
    99_999_999_999_999,
    999_999_999_999_999,
    9_999_999_999_999_999,
    99_999_999_999_999_999,
    999_999_999_999_999_999,
];

/// Coefficient capacity of an `i64` magnitude.
#[allow(clippy::cast_sign_loss)]
const COEFFICIENT_CAP: u64 = i64::MAX as u64;

/// A lexed decimal literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'a> {
    Infinity { negative: bool },
    NaN { signaling: bool },
    Number(Digits<'a>),
}

/// The digit strings of a finite literal. Both parts hold ASCII digits only.
///
/// An empty literal has no digits at all and reads as positive zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Digits<'a> {
    pub negative: bool,
    pub integer: &'a str,
    pub fraction: &'a str,
    /// The explicit `e` exponent, before accounting for fraction digits.
    pub exponent: i64,
}

impl Digits<'_> {
    /// Iterate every digit value, integer part first.
    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        self.integer
            .bytes()
            .chain(self.fraction.bytes())
            .map(|b| b - b'0')
    }

    /// Exponent of the last digit when all digits are kept.
    #[allow(clippy::cast_possible_wrap)]
    pub fn scale(&self) -> i64 {
        self.exponent - self.fraction.len() as i64
    }
}

/// Split `text` into its sign, digits and exponent.
///
/// Accepts `[+-]digits[.digits][(e|E)[+-]digits]` and the case-insensitive
/// keywords `inf`, `infinity`, `nan` and `snan`. Surrounding whitespace is
/// ignored. NaN keywords may not carry a sign.
///
/// # Errors
///
/// Returns [`ParseError`] if `text` is not a decimal literal.
pub fn lex(text: &str) -> ParseResult<Literal<'_>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Literal::Number(Digits::default()));
    }

    let (negative, signed, body) = match text.as_bytes()[0] {
        b'-' => (true, true, &text[1..]),
        b'+' => (false, true, &text[1..]),
        _ => (false, false, text),
    };
    let offset = usize::from(signed);

    if body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return lex_keyword(body, negative, signed, offset);
    }

    let bytes = body.as_bytes();
    let digit_run = |from: usize| {
        bytes[from..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |n| from + n)
    };

    let integer_end = digit_run(0);
    let integer = &body[..integer_end];
    let mut pos = integer_end;

    let mut fraction = "";
    if bytes.get(pos) == Some(&b'.') {
        let end = digit_run(pos + 1);
        fraction = &body[pos + 1..end];
        pos = end;
    }

    if integer.is_empty() && fraction.is_empty() {
        return Err(ParseError::NoDigits);
    }

    let mut exponent = 0i64;
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        let exponent_negative = match bytes.get(pos) {
            Some(b'-') => {
                pos += 1;
                true
            }
            Some(b'+') => {
                pos += 1;
                false
            }
            _ => false,
        };
        let start = pos;
        while let Some(&b) = bytes.get(pos).filter(|b| b.is_ascii_digit()) {
            exponent = exponent * 10 + i64::from(b - b'0');
            if exponent > EXPONENT_CAP {
                return Err(ParseError::ExponentOutOfRange);
            }
            pos += 1;
        }
        if pos == start {
            return Err(ParseError::MissingExponentDigits);
        }
        if exponent_negative {
            exponent = -exponent;
        }
    }

    if let Some(character) = body[pos..].chars().next() {
        return Err(ParseError::UnexpectedCharacter {
            character,
            position: offset + pos,
        });
    }

    Ok(Literal::Number(Digits {
        negative,
        integer,
        fraction,
        exponent,
    }))
}

fn lex_keyword(
    word: &str,
    negative: bool,
    signed: bool,
    offset: usize,
) -> ParseResult<Literal<'_>> {
    if word.eq_ignore_ascii_case("inf") || word.eq_ignore_ascii_case("infinity") {
        return Ok(Literal::Infinity { negative });
    }

    let signaling = if word.eq_ignore_ascii_case("nan") {
        false
    } else if word.eq_ignore_ascii_case("snan") {
        true
    } else {
        return Err(ParseError::UnexpectedCharacter {
            character: word.chars().next().unwrap_or_default(),
            position: offset,
        });
    };

    if signed {
        return Err(ParseError::SignedNaN);
    }
    Ok(Literal::NaN { signaling })
}

/// A coefficient magnitude that fits an `i64`, with its exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Significand {
    pub magnitude: u64,
    pub exponent: i64,
    pub rounded: bool,
}

/// Accumulate the digits of a literal into at most `significant_digits`
/// digits, rounding the rest away half-to-even.
///
/// `significant_digits` of 0 or less, or too large for an `i64`, means the
/// full `i64` capacity. Dropped integer digits raise the exponent; dropped
/// fraction digits only take part in rounding.
pub fn round_significand(digits: &Digits<'_>, significant_digits: i32) -> Significand {
    let cap = usize::try_from(significant_digits)
        .ok()
        .filter(|&n| n > 0 && n < DIGITS_MAX.len())
        .map_or(COEFFICIENT_CAP, |n| DIGITS_MAX[n]);

    let integer_len = digits.integer.len();
    let mut magnitude = 0u64;
    let mut exponent = digits.exponent;
    let mut first_dropped: Option<u8> = None;
    let mut sticky = false;

    for (i, digit) in digits.digits().enumerate() {
        let in_fraction = i >= integer_len;
        if first_dropped.is_none() {
            let next = magnitude
                .checked_mul(10)
                .and_then(|m| m.checked_add(u64::from(digit)))
                .filter(|&m| m <= cap);
            if let Some(next) = next {
                magnitude = next;
                if in_fraction {
                    exponent -= 1;
                }
                continue;
            }
            first_dropped = Some(digit);
        } else if digit != 0 {
            sticky = true;
        }
        if !in_fraction {
            exponent += 1;
        }
    }

    let Some(first) = first_dropped else {
        return Significand {
            magnitude,
            exponent,
            rounded: false,
        };
    };

    if first > 5 || (first == 5 && (sticky || magnitude & 1 == 1)) {
        magnitude += 1;
        if magnitude > cap {
            // Only reachable from magnitude == cap: either an exact power of
            // ten, or i64::MAX + 1, whose last digit (8) always rounds up.
            let remainder = magnitude % 10;
            magnitude /= 10;
            exponent += 1;
            if remainder >= 5 {
                magnitude += 1;
            }
        }
    }

    Significand {
        magnitude,
        exponent,
        rounded: first != 0 || sticky,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> Digits<'_> {
        match lex(text).unwrap() {
            Literal::Number(d) => d,
            other => panic!("expected number, got {other:?}"),
        }
    }

    fn rounded(text: &str, significant_digits: i32) -> Significand {
        round_significand(&number(text), significant_digits)
    }

    #[test]
    fn test_lex_parts() {
        let d = number("-12.50e+3");
        assert!(d.negative);
        assert_eq!(d.integer, "12");
        assert_eq!(d.fraction, "50");
        assert_eq!(d.exponent, 3);
        assert_eq!(d.scale(), 1);
    }

    #[test]
    fn test_lex_bare_fraction_and_point() {
        assert_eq!(number(".5").fraction, "5");
        assert_eq!(number("5.").integer, "5");
        assert_eq!(number("  7  ").integer, "7");
    }

    #[test]
    fn test_lex_empty_is_zero() {
        assert_eq!(number(""), Digits::default());
    }

    #[test]
    fn test_lex_keywords() {
        assert_eq!(lex("INF"), Ok(Literal::Infinity { negative: false }));
        assert_eq!(lex("-Infinity"), Ok(Literal::Infinity { negative: true }));
        assert_eq!(lex("+inf"), Ok(Literal::Infinity { negative: false }));
        assert_eq!(lex("NaN"), Ok(Literal::NaN { signaling: false }));
        assert_eq!(lex("sNaN"), Ok(Literal::NaN { signaling: true }));
    }

    #[test]
    fn test_lex_signed_nan_rejected() {
        assert_eq!(lex("-nan"), Err(ParseError::SignedNaN));
        assert_eq!(lex("-snan"), Err(ParseError::SignedNaN));
        assert_eq!(lex("+nan"), Err(ParseError::SignedNaN));
    }

    #[test]
    fn test_lex_errors() {
        assert_eq!(lex("-"), Err(ParseError::NoDigits));
        assert_eq!(lex("."), Err(ParseError::NoDigits));
        assert_eq!(lex("1e"), Err(ParseError::MissingExponentDigits));
        assert_eq!(lex("1e+"), Err(ParseError::MissingExponentDigits));
        assert_eq!(lex("1e9999999999"), Err(ParseError::ExponentOutOfRange));
        assert_eq!(
            lex("1.2.3"),
            Err(ParseError::UnexpectedCharacter {
                character: '.',
                position: 3
            })
        );
        assert_eq!(
            lex("-12x"),
            Err(ParseError::UnexpectedCharacter {
                character: 'x',
                position: 3
            })
        );
        assert!(lex("infinityx").is_err());
    }

    #[test]
    fn test_round_exact() {
        let s = rounded("123.45", 0);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (12345, -2, false));
    }

    #[test]
    fn test_round_half_even_digits() {
        let s = rounded("5.935555e-1", 4);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (5936, -4, true));

        let s = rounded("1.473445219134543e1", 6);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (147_345, -4, true));

        // Exact tie rounds to the even neighbour.
        let s = rounded("1.594365", 6);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (159_436, -5, true));
        let s = rounded("1.594375", 6);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (159_438, -5, true));
    }

    #[test]
    fn test_round_integer_digits_raise_exponent() {
        let s = rounded("9223372036854775808", 0);
        assert_eq!(s.magnitude, 922_337_203_685_477_581);
        assert_eq!(s.exponent, 1);
        assert!(s.rounded);

        let s = rounded("9223372036854775815", 0);
        assert_eq!(s.magnitude, 922_337_203_685_477_582);

        let s = rounded("9223372036854775825", 0);
        assert_eq!(s.magnitude, 922_337_203_685_477_582);
    }

    #[test]
    fn test_round_dropped_zeros_are_exact() {
        let s = rounded("123000", 3);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (123, 3, false));
    }

    #[test]
    fn test_round_carry_past_cap() {
        let s = rounded("99996", 4);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (1000, 2, true));

        let s = rounded("9223372036854775807.5", 0);
        assert_eq!(s.magnitude, 922_337_203_685_477_581);
        assert_eq!(s.exponent, 1);
        assert!(s.rounded);
    }

    #[test]
    fn test_round_leading_zeros_do_not_count() {
        let s = rounded("0.000123456", 3);
        assert_eq!((s.magnitude, s.exponent, s.rounded), (123, -6, true));
    }
}
