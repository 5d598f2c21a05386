use std::io;

use thiserror::Error;

/// Errors that can occur while decoding the compact float format
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Compact float value is incomplete")]
    Incomplete,

    #[error("Exponent {0} is too big")]
    ExponentTooBig(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors that can occur while encoding
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Buffer too small: need {required} bytes, got {available}")]
    BufferTooSmall { required: usize, available: usize },

    #[error("Exponent {0} cannot be encoded: magnitude exceeds 0x7fffffff")]
    ExponentOutOfRange(i32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors produced when text is not a decimal literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{character:?}: Unexpected character at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Input contains no digits")]
    NoDigits,

    #[error("Exponent marker is not followed by any digits")]
    MissingExponentDigits,

    #[error("Exponent overflow while decoding decimal")]
    ExponentOutOfRange,

    #[error("NaN cannot be signed")]
    SignedNaN,
}

/// Errors produced when converting between numeric representations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("{0} is not a whole number")]
    NotWholeNumber(String),

    #[error("{value} does not fit into {target}")]
    Overflow { value: String, target: &'static str },

    #[error("{0} is negative")]
    Negative(String),

    #[error("{0} is not a finite number")]
    NotFinite(String),

    #[error("Exponent {0} does not fit into a DFloat")]
    ExponentOutOfRange(i64),

    #[error("Value was rounded")]
    Rounded,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encoding operations
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for numeric conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Whether a conversion kept every digit of its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Exact,
    Rounded,
}

/// The outcome of a conversion that may round.
///
/// Rounding is not a failure: the best-effort value is always present, and
/// [`precision`](Self::precision) tells whether low-order digits were rounded
/// away (half-to-even). Callers that must not lose digits can use
/// [`exact`](Self::exact) to turn rounding into [`ConversionError::Rounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Conversion<T> {
    value: T,
    precision: Precision,
}

impl<T> Conversion<T> {
    pub const fn new(value: T, precision: Precision) -> Self {
        Self { value, precision }
    }

    pub const fn exact_value(value: T) -> Self {
        Self::new(value, Precision::Exact)
    }

    pub const fn rounded_value(value: T) -> Self {
        Self::new(value, Precision::Rounded)
    }

    pub const fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub const fn precision(&self) -> Precision {
        self.precision
    }

    pub const fn is_exact(&self) -> bool {
        matches!(self.precision, Precision::Exact)
    }

    pub const fn is_rounded(&self) -> bool {
        matches!(self.precision, Precision::Rounded)
    }

    /// Return the value only if no rounding took place.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::Rounded`] if digits were rounded away.
    pub fn exact(self) -> ConversionResult<T> {
        match self.precision {
            Precision::Exact => Ok(self.value),
            Precision::Rounded => Err(ConversionError::Rounded),
        }
    }
}
