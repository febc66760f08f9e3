//! Comparison of the reference model with the hardware output.
//!
//! The hardware output is delayed with respect to the reference model output.
//! The first TAPS-1 reference outputs, which are computed from a partially
//! filled window, are discarded, and the remaining reference outputs are
//! compared sample by sample with the hardware output. The comparison is
//! summarized in [`ComparisonMetrics`].

use crate::config::FilterConfig;
use crate::error::{Error, Result};

/// Term added to the magnitude of each reference sample when calculating the
/// relative error.
///
/// This avoids divisions by zero when a reference sample is exactly zero.
pub const RELATIVE_ERROR_EPSILON: f64 = 1e-12;

/// Signal to noise ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Snr {
    /// SNR in dB.
    Db(f64),
    /// The error power is zero, so the SNR is not defined.
    ///
    /// This happens when the hardware output matches the reference exactly.
    Degenerate,
}

impl Snr {
    /// Gives the SNR in dB.
    ///
    /// A degenerate SNR is given as positive infinity.
    pub fn db(self) -> f64 {
        match self {
            Snr::Db(db) => db,
            Snr::Degenerate => f64::INFINITY,
        }
    }

    /// Gives the SNR in dB, or `None` if the SNR is degenerate.
    pub fn finite_db(self) -> Option<f64> {
        match self {
            Snr::Db(db) => Some(db),
            Snr::Degenerate => None,
        }
    }

    /// Returns `true` if the SNR is degenerate.
    pub fn is_degenerate(self) -> bool {
        matches!(self, Snr::Degenerate)
    }
}

impl std::fmt::Display for Snr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            Snr::Db(db) => write!(f, "{db:.2} dB"),
            Snr::Degenerate => write!(f, "inf dB (zero error power)"),
        }
    }
}

/// Comparison metrics.
///
/// Error and fidelity metrics of a hardware output sequence with respect to
/// the reference output sequence.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComparisonMetrics {
    /// Mean of the squared reference samples.
    pub signal_power: f64,
    /// Mean of the squared errors.
    pub error_power: f64,
    /// Ratio between the signal power and the error power.
    pub snr: Snr,
    /// Maximum absolute error.
    pub max_abs_error: f64,
    /// Index of the first sample with the maximum absolute error.
    pub max_abs_error_index: usize,
    /// Mean absolute error.
    pub mean_abs_error: f64,
    /// Mean of the absolute errors relative to the reference sample magnitude.
    pub mean_relative_error: f64,
}

/// Aligns the reference output with the hardware output.
///
/// The first `taps - 1` samples of `reference` are dropped, and then as many
/// samples as there are in `hardware` are taken. Returns the aligned reference
/// and hardware sequences, which have the same length.
///
/// Fails with [`Error::LengthMismatch`] if `reference` does not have enough
/// samples after the first `taps - 1`.
pub fn align<'a>(
    reference: &'a [f64],
    hardware: &'a [f64],
    taps: usize,
) -> Result<(&'a [f64], &'a [f64])> {
    let warmup = taps.saturating_sub(1);
    let available = reference.len().saturating_sub(warmup);
    if hardware.len() > available {
        return Err(Error::LengthMismatch {
            expected: available,
            actual: hardware.len(),
        });
    }
    Ok((&reference[warmup..warmup + hardware.len()], hardware))
}

/// Calculates the comparison metrics of two aligned sequences.
///
/// The error is `reference - hardware`. Fails with [`Error::LengthMismatch`]
/// if the sequences do not have the same length, and with
/// [`Error::EmptySequence`] if they are empty, and with [`Error::NonFinite`]
/// if any sample is NaN or infinite. If the error is zero, the [`Snr`] is
/// [`Snr::Degenerate`].
pub fn metrics(reference: &[f64], hardware: &[f64]) -> Result<ComparisonMetrics> {
    if reference.len() != hardware.len() {
        return Err(Error::LengthMismatch {
            expected: reference.len(),
            actual: hardware.len(),
        });
    }
    if reference.is_empty() {
        return Err(Error::EmptySequence);
    }
    if let Some(&x) = reference.iter().chain(hardware).find(|x| !x.is_finite()) {
        return Err(Error::NonFinite(x));
    }
    let signal_power = mean(reference, hardware, |r, _| r * r);
    let error_power = mean(reference, hardware, |r, h| (r - h) * (r - h));
    let mean_abs_error = mean(reference, hardware, |r, h| (r - h).abs());
    let mean_relative_error = mean(reference, hardware, |r, h| {
        (r - h).abs() / (r.abs() + RELATIVE_ERROR_EPSILON)
    });
    let (max_abs_error_index, max_abs_error) = reference
        .iter()
        .zip(hardware.iter())
        .map(|(&r, &h)| (r - h).abs())
        .enumerate()
        .fold((0, 0.0), |(imax, max), (i, e)| {
            if e > max {
                (i, e)
            } else {
                (imax, max)
            }
        });
    let snr = if error_power == 0.0 {
        Snr::Degenerate
    } else {
        Snr::Db(10.0 * (signal_power / error_power).log10())
    };

    Ok(ComparisonMetrics {
        signal_power,
        error_power,
        snr,
        max_abs_error,
        max_abs_error_index,
        mean_abs_error,
        mean_relative_error,
    })
}

fn mean(reference: &[f64], hardware: &[f64], f: impl Fn(f64, f64) -> f64) -> f64 {
    reference
        .iter()
        .zip(hardware.iter())
        .map(|(&r, &h)| f(r, h))
        .sum::<f64>()
        / reference.len() as f64
}

/// Converts hardware output words into real values.
///
/// The words, decoded with the output width N3, are divided by the
/// coefficient scale `2^(N1-1)`.
pub fn rescale_hardware(words: &[i64], config: &FilterConfig) -> Vec<f64> {
    let scale = config.coefficient_scale();
    words.iter().map(|&w| w as f64 / scale).collect()
}

/// Result of a comparison.
///
/// This contains the aligned reference and hardware sequences, and their
/// comparison metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<'a> {
    /// Aligned reference output.
    pub reference: &'a [f64],
    /// Aligned hardware output.
    pub hardware: &'a [f64],
    /// Comparison metrics.
    pub metrics: ComparisonMetrics,
}

impl Comparison<'_> {
    /// Returns an iterator over the error sequence `reference - hardware`.
    pub fn errors(&self) -> impl Iterator<Item = f64> + '_ {
        self.reference
            .iter()
            .zip(self.hardware.iter())
            .map(|(&r, &h)| r - h)
    }

    /// Returns the JSON representation of the comparison.
    pub fn to_json(&self) -> firmodel_json::Comparison {
        let m = &self.metrics;
        firmodel_json::Comparison {
            hardware_length: self.hardware.len() as u64,
            aligned_length: self.reference.len() as u64,
            signal_power: m.signal_power,
            error_power: m.error_power,
            snr_db: m.snr.finite_db(),
            snr_degenerate: m.snr.is_degenerate(),
            max_abs_error: m.max_abs_error,
            max_abs_error_index: m.max_abs_error_index as u64,
            mean_abs_error: m.mean_abs_error,
            mean_relative_error: m.mean_relative_error,
        }
    }
}

/// Compares a reference output with a hardware output.
///
/// This aligns both sequences according to the number of taps in `config` and
/// calculates the comparison metrics.
pub fn compare<'a>(
    reference: &'a [f64],
    hardware: &'a [f64],
    config: &FilterConfig,
) -> Result<Comparison<'a>> {
    let (reference, hardware) = align(reference, hardware, config.taps())?;
    tracing::debug!(
        aligned_length = reference.len(),
        latency = config.latency(),
        "aligned reference and hardware outputs"
    );
    let metrics = metrics(reference, hardware)?;
    Ok(Comparison {
        reference,
        hardware,
        metrics,
    })
}
