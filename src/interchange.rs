//! Sequence interchange format.
//!
//! Sequences are exchanged with the RTL simulation as text, with one value
//! per line. Fixed-point sequences (coefficients, input samples and hardware
//! output) use one two's complement [`BinaryString`] per line, most
//! significant bit first. Real-valued sequences (input stimulus, real
//! coefficients and the reference output) use one decimal number per line.
//!
//! The functions in this module only parse and format text. Reading and
//! writing the files is left to the caller.

use crate::codec::{BinaryString, BitWidth, SignedFixed};
use crate::error::{Error, Result};

/// Parses a sequence of binary strings, one per line.
///
/// Each line must contain a binary string of at most `width` characters.
/// Trailing whitespace, such as the `\r` of a CRLF line ending, is ignored.
/// Errors are reported as [`Error::Line`], with the number of the offending
/// line.
pub fn parse_binary_lines(text: &str, width: BitWidth) -> Result<Vec<SignedFixed>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| {
            BinaryString::parse(line.trim_end(), width)
                .map(|bits| SignedFixed::from_binary(&bits))
                .map_err(|e| e.at_line(n + 1))
        })
        .collect()
}

/// Formats a sequence of fixed-point values as binary strings, one per line.
pub fn write_binary_lines(values: &[SignedFixed]) -> String {
    let mut text = String::with_capacity(values.iter().map(|x| x.width().bits() as usize + 1).sum());
    for x in values {
        text.push_str(x.to_binary().as_str());
        text.push('\n');
    }
    text
}

/// Parses a sequence of real numbers, one per line.
///
/// Empty lines and lines starting with `#` are ignored. NaN and infinite
/// values are rejected with [`Error::NonFinite`]. Errors are reported as
/// [`Error::Line`], with the number of the offending line.
pub fn parse_real_lines(text: &str) -> Result<Vec<f64>> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| parse_real(line).map_err(|e| e.at_line(n + 1)))
        .collect()
}

fn parse_real(s: &str) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        Ok(x) => Err(Error::NonFinite(x)),
        Err(_) => Err(Error::InvalidNumber(s.to_string())),
    }
}

/// Formats a sequence of real numbers, one per line.
///
/// The numbers are formatted so that [`parse_real_lines`] gives back exactly
/// the same values.
pub fn write_real_lines(values: &[f64]) -> String {
    values.iter().map(|x| format!("{x:?}\n")).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn binary_lines() {
        let width = BitWidth::new(8).unwrap();
        let text = "00010000\r\n11111111\n10000000\n";
        let values = parse_binary_lines(text, width).unwrap();
        assert_eq!(
            values.iter().map(|x| x.value()).collect::<Vec<_>>(),
            vec![16, -1, -128]
        );
        assert_eq!(write_binary_lines(&values), text.replace('\r', ""));
        assert!(parse_binary_lines("", width).unwrap().is_empty());
    }

    #[test]
    fn binary_line_errors() {
        let width = BitWidth::new(4).unwrap();
        assert_eq!(
            parse_binary_lines("0101\n10101\n", width),
            Err(Error::Line {
                line: 2,
                source: Box::new(Error::InvalidWidth {
                    length: 5,
                    width: 4
                })
            })
        );
        assert_eq!(
            parse_binary_lines("0101\n\n0000\n", width),
            Err(Error::Line {
                line: 2,
                source: Box::new(Error::EmptyString)
            })
        );
        let err = parse_binary_lines("0102\n", width).unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 1: invalid character '2' at position 3 of binary string"
        );
    }

    #[test]
    fn real_lines() {
        let text = "# stimulus\n0.5\n\n-1.25\n  3e-3 \n";
        assert_eq!(parse_real_lines(text), Ok(vec![0.5, -1.25, 0.003]));
        assert_eq!(
            parse_real_lines("1.0\nabc\n"),
            Err(Error::Line {
                line: 2,
                source: Box::new(Error::InvalidNumber("abc".to_string()))
            })
        );
        assert_eq!(
            parse_real_lines("1.0\n-inf\n"),
            Err(Error::Line {
                line: 2,
                source: Box::new(Error::NonFinite(f64::NEG_INFINITY))
            })
        );
        // NaN != NaN, so the error is checked by matching
        let err = parse_real_lines("1.0\nNaN\n5.0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Line { line: 2, ref source } if matches!(**source, Error::NonFinite(x) if x.is_nan())
        ));
        assert_eq!(err.to_string(), "line 2: non-finite value NaN");
        let values = vec![0.1, -2.0, 1.0 / 3.0, 1e-300];
        assert_eq!(parse_real_lines(&write_real_lines(&values)), Ok(values));
    }
}
