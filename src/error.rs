//! Error types.
//!
//! This module contains the [`Error`] type returned by the fixed-point codec,
//! the quantizer, the FIR model and the comparison routines. Each variant
//! carries enough context (offending index, expected and actual lengths or
//! widths) to diagnose a mismatched test configuration.

use thiserror::Error;

/// Result type of the firmodel library.
pub type Result<T> = std::result::Result<T, Error>;

/// firmodel error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A binary string is longer than its declared bit width.
    #[error("binary string of length {length} exceeds width of {width} bits")]
    InvalidWidth {
        /// Length of the binary string.
        length: usize,
        /// Declared bit width.
        width: u32,
    },
    /// A binary string contains a character other than `'0'` or `'1'`.
    #[error("invalid character {character:?} at position {position} of binary string")]
    InvalidDigit {
        /// Offending character.
        character: char,
        /// Position of the character in the string.
        position: usize,
    },
    /// A binary string is empty.
    #[error("empty binary string")]
    EmptyString,
    /// A bit width is outside of the supported range.
    #[error("bit width {0} is not between 1 and 64")]
    UnsupportedWidth(u32),
    /// A value does not fit in a bit width and the overflow policy rejects it.
    #[error("value {value} does not fit in {width} bits")]
    Overflow {
        /// Value to encode.
        value: i64,
        /// Destination bit width.
        width: u32,
    },
    /// A real value is NaN or infinite.
    #[error("non-finite value {0}")]
    NonFinite(f64),
    /// Two sequences do not have the required lengths.
    #[error("length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// An element of a sequence does not have the required bit width.
    #[error("element {index} has a width of {actual} bits, expected {expected} bits")]
    WidthMismatch {
        /// Index of the offending element.
        index: usize,
        /// Expected bit width.
        expected: u32,
        /// Actual bit width.
        actual: u32,
    },
    /// The number of coefficients does not match the number of taps.
    #[error("filter has {expected} taps but {actual} coefficients were given")]
    TapCountMismatch {
        /// Number of taps of the filter.
        expected: usize,
        /// Number of coefficients given.
        actual: usize,
    },
    /// The filter has no taps.
    #[error("filter must have at least one tap")]
    NoTaps,
    /// Metrics were requested for empty sequences.
    #[error("cannot compute metrics of empty sequences")]
    EmptySequence,
    /// A line of an interchange file could not be parsed.
    #[error("line {line}: {source}")]
    Line {
        /// Line number, starting at 1.
        line: usize,
        /// Parse error.
        #[source]
        source: Box<Error>,
    },
    /// A line of a real-valued sequence file is not a number.
    #[error("{0:?} is not a valid number")]
    InvalidNumber(String),
}

impl Error {
    pub(crate) fn at_line(self, line: usize) -> Error {
        Error::Line {
            line,
            source: Box::new(self),
        }
    }
}
