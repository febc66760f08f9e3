//! FIR filter reference model.
//!
//! This module replicates the arithmetic of a synchronous FIR filter pipeline:
//! each output sample is the multiply-accumulate of the last TAPS input
//! samples with the quantized coefficients, and the coefficient scale
//! `2^(N1-1)` is removed once per output sample, after the accumulation.
//!
//! The filter is causal. At the start of the sequence only the input samples
//! that have been seen so far are used, so the first TAPS-1 outputs are
//! computed from a partial window. These outputs do not correspond to the
//! output of a fully loaded hardware pipeline and are discarded by
//! [`align`](crate::compare::align).

use crate::codec::{OverflowPolicy, SignedFixed};
use crate::config::FilterConfig;
use crate::error::{Error, Result};
use crate::quantizer::Coefficient;

/// FIR filter.
///
/// This struct holds the quantized coefficients of a filter and the filter
/// configuration. It is immutable, so a single `FirFilter` can be used to
/// filter any number of sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirFilter {
    coefficients: Vec<Coefficient>,
    config: FilterConfig,
}

impl FirFilter {
    /// Creates a new FIR filter.
    ///
    /// There must be as many `coefficients` as taps in the configuration, and
    /// all of them must have the coefficient width of the configuration.
    pub fn new(coefficients: Vec<Coefficient>, config: &FilterConfig) -> Result<FirFilter> {
        if coefficients.len() != config.taps() {
            return Err(Error::TapCountMismatch {
                expected: config.taps(),
                actual: coefficients.len(),
            });
        }
        check_widths(&coefficients, config.coefficient_width().bits())?;
        Ok(FirFilter {
            coefficients,
            config: *config,
        })
    }

    /// Gives the quantized coefficients of the filter.
    pub fn coefficients(&self) -> &[Coefficient] {
        &self.coefficients
    }

    /// Gives the filter configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filters a sequence of real samples.
    ///
    /// For each output index `i`, the accumulator `sum(h[j] * x[i - j])` is
    /// calculated over the taps `j` with `i - j >= 0`, using the integer value
    /// of the quantized coefficients `h`. The output is the accumulator
    /// divided by `2^(N1-1)`. The output has the same length as the input.
    pub fn convolve(&self, samples: &[f64]) -> Vec<f64> {
        let scale = self.config.coefficient_scale();
        (0..samples.len())
            .map(|i| {
                let acc = self
                    .coefficients
                    .iter()
                    .zip(samples[..=i].iter().rev())
                    .map(|(h, &x)| h.value() as f64 * x)
                    .sum::<f64>();
                acc / scale
            })
            .collect()
    }

    /// Filters a sequence of quantized samples with integer arithmetic.
    ///
    /// This computes the output words of a hardware implementation. The
    /// samples must have the input width N2. For each output, the products of
    /// the coefficients and samples are accumulated exactly, the accumulator
    /// is shifted right arithmetically by N1-1 bits to remove the coefficient
    /// scale, and the result is fitted into the output width N3 according to
    /// the overflow policy of the configuration. Only the shifted output word
    /// is fitted into N3, so an accumulator wider than N3 bits is not an
    /// overflow if the output word fits.
    ///
    /// The output words, divided by `2^(N1-1)`, approximate the output of
    /// [`FirFilter::convolve`] applied to the real samples before
    /// quantization.
    pub fn convolve_fixed(&self, samples: &[SignedFixed]) -> Result<Vec<SignedFixed>> {
        check_widths(samples, self.config.input_width().bits())?;
        let shift = self.config.coefficient_width().bits() - 1;
        let output_width = self.config.output_width();
        let policy = self.config.overflow();
        (0..samples.len())
            .map(|i| {
                let acc = self
                    .coefficients
                    .iter()
                    .zip(samples[..=i].iter().rev())
                    .map(|(h, x)| i128::from(h.value()) * i128::from(x.value()))
                    .fold(0i128, i128::wrapping_add);
                let acc = acc >> shift;
                let acc = match policy {
                    // the low 64 bits are enough to wrap into N3 <= 64 bits
                    OverflowPolicy::Wrap => acc as i64,
                    _ => acc.clamp(i64::MIN.into(), i64::MAX.into()) as i64,
                };
                SignedFixed::with_policy(acc, output_width, policy)
            })
            .collect()
    }
}

fn check_widths(values: &[SignedFixed], expected: u32) -> Result<()> {
    match values
        .iter()
        .enumerate()
        .find(|(_, x)| x.width().bits() != expected)
    {
        Some((index, x)) => Err(Error::WidthMismatch {
            index,
            expected,
            actual: x.width().bits(),
        }),
        None => Ok(()),
    }
}
