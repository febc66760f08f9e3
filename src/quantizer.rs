//! Coefficient and sample quantization.
//!
//! Real values are converted to fixed-point by multiplying them by the
//! coefficient scale `2^(N1-1)` and truncating towards zero. Coefficients are
//! then represented with N1 bits, in Q(N1-1) format, and input samples with N2
//! bits. All the values of a set share the same scale, so that the FIR model
//! only needs to remove it once per output sample.

use crate::codec::{BitWidth, OverflowPolicy, SignedFixed};
use crate::config::FilterConfig;
use crate::error::{Error, Result};

/// Quantized FIR filter coefficient.
///
/// A coefficient is a [`SignedFixed`] with the coefficient width N1.
pub type Coefficient = SignedFixed;

/// Quantizes a real value with a given scale into a given width.
fn quantize_scaled(
    value: f64,
    scale: f64,
    width: BitWidth,
    policy: OverflowPolicy,
) -> Result<SignedFixed> {
    if !value.is_finite() {
        return Err(Error::NonFinite(value));
    }
    // float to int casts truncate towards zero and saturate at the limits of
    // i64, which is then handled by the overflow policy
    SignedFixed::with_policy((value * scale) as i64, width, policy)
}

/// Quantizes a real filter coefficient into Q(N1-1) format.
///
/// The value is multiplied by `2^(N1-1)`, where N1 is the number of bits in
/// `width`, truncated towards zero, and represented with `width` bits. Values
/// that do not fit (for instance, a coefficient equal to 1.0) are handled
/// according to `policy`.
///
/// # Examples
/// ```
/// use firmodel::codec::{BitWidth, OverflowPolicy};
/// use firmodel::quantizer::quantize;
/// # fn main() -> Result<(), firmodel::Error> {
/// let coefficient = quantize(1.0 / 8.0, BitWidth::new(8)?, OverflowPolicy::Reject)?;
/// assert_eq!(coefficient.value(), 16);
/// assert_eq!(coefficient.to_binary().as_str(), "00010000");
/// # Ok(())
/// # }
/// ```
pub fn quantize(value: f64, width: BitWidth, policy: OverflowPolicy) -> Result<Coefficient> {
    quantize_scaled(value, width.scale(), width, policy)
}

/// Quantizes the coefficients of a filter.
///
/// The number of coefficients must be equal to the number of taps of the
/// filter.
pub fn quantize_coefficients(coefficients: &[f64], config: &FilterConfig) -> Result<Vec<Coefficient>> {
    if coefficients.len() != config.taps() {
        return Err(Error::TapCountMismatch {
            expected: config.taps(),
            actual: coefficients.len(),
        });
    }
    coefficients
        .iter()
        .map(|&c| quantize(c, config.coefficient_width(), config.overflow()))
        .collect()
}

/// Quantizes the input samples of a filter.
///
/// The samples are scaled by the coefficient scale `2^(N1-1)` and represented
/// with the input width N2. These are the samples that the hardware filter
/// receives.
pub fn quantize_samples(samples: &[f64], config: &FilterConfig) -> Result<Vec<SignedFixed>> {
    samples
        .iter()
        .map(|&x| {
            quantize_scaled(
                x,
                config.coefficient_scale(),
                config.input_width(),
                config.overflow(),
            )
        })
        .collect()
}

/// Converts quantized input samples back to real values.
///
/// This removes the coefficient scale `2^(N1-1)` applied by
/// [`quantize_samples`].
pub fn dequantize_samples(samples: &[SignedFixed], config: &FilterConfig) -> Vec<f64> {
    let scale = config.coefficient_scale();
    samples.iter().map(|x| x.value() as f64 / scale).collect()
}

/// Gives the real coefficients of a moving average filter.
///
/// All the `taps` coefficients are equal to `1/taps`.
pub fn moving_average(taps: usize) -> Vec<f64> {
    vec![1.0 / taps as f64; taps]
}

#[cfg(test)]
mod test {
    use super::*;

    fn width(bits: u32) -> BitWidth {
        BitWidth::new(bits).unwrap()
    }

    #[test]
    fn one_eighth() {
        let c = quantize(1.0 / 8.0, width(8), OverflowPolicy::Reject).unwrap();
        assert_eq!(c.value(), 16);
        assert_eq!(c.width(), width(8));
        assert_eq!(c.to_binary().as_str(), "00010000");
    }

    #[test]
    fn truncation() {
        let w = width(8);
        // 0.3 * 128 = 38.4
        assert_eq!(quantize(0.3, w, OverflowPolicy::Reject).unwrap().value(), 38);
        // -0.3 * 128 = -38.4 truncates towards zero
        assert_eq!(
            quantize(-0.3, w, OverflowPolicy::Reject).unwrap().value(),
            -38
        );
        assert_eq!(
            quantize(-1.0, w, OverflowPolicy::Reject).unwrap().value(),
            -128
        );
    }

    #[test]
    fn full_scale() {
        let w = width(8);
        // 1.0 * 128 does not fit in 8 bits
        assert_eq!(
            quantize(1.0, w, OverflowPolicy::Reject),
            Err(Error::Overflow {
                value: 128,
                width: 8
            })
        );
        assert_eq!(
            quantize(1.0, w, OverflowPolicy::Saturate).unwrap().value(),
            127
        );
        assert_eq!(quantize(1.0, w, OverflowPolicy::Wrap).unwrap().value(), -128);
    }

    #[test]
    fn non_finite() {
        let w = width(8);
        assert!(matches!(
            quantize(f64::NAN, w, OverflowPolicy::Wrap),
            Err(Error::NonFinite(_))
        ));
        assert_eq!(
            quantize(f64::INFINITY, w, OverflowPolicy::Saturate),
            Err(Error::NonFinite(f64::INFINITY))
        );
    }

    #[test]
    fn coefficients() {
        let config = FilterConfig::default();
        let h = quantize_coefficients(&moving_average(8), &config).unwrap();
        assert_eq!(h.len(), 8);
        assert!(h.iter().all(|c| c.value() == 16));
        assert_eq!(
            quantize_coefficients(&moving_average(4), &config),
            Err(Error::TapCountMismatch {
                expected: 8,
                actual: 4
            })
        );
    }

    #[test]
    fn samples() {
        let config = FilterConfig::default();
        let x = quantize_samples(&[0.5, -0.25, 3.0, 1.0 / 256.0], &config).unwrap();
        let values = x.iter().map(|s| s.value()).collect::<Vec<_>>();
        assert_eq!(values, vec![64, -32, 384, 0]);
        assert!(x.iter().all(|s| s.width() == config.input_width()));
        assert_eq!(
            dequantize_samples(&x, &config),
            vec![0.5, -0.25, 3.0, 0.0]
        );
    }
}
