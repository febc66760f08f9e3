//! Default filter parameters.
//!
//! This module contains the parameters of the FIR filter hardware
//! implementation that are used when the configuration file does not give
//! them.

use firmodel_json::OverflowPolicy;

/// Number of filter taps.
pub const TAPS: usize = 8;

/// Number of bits used for the FIR filter coefficients (N1).
///
/// Coefficients use a Q(N1-1) format: one sign bit and N1-1 fractional bits.
pub const COEFFICIENT_BITS: u32 = 8;

/// Number of bits used for the FIR filter input samples (N2).
pub const INPUT_BITS: u32 = 16;

/// Number of bits of the FIR filter output, which is the width of the
/// multiply-accumulate register (N3).
pub const OUTPUT_BITS: u32 = 32;

/// Number of pipeline stages of the hardware implementation.
///
/// These add latency on top of the TAPS-1 samples of causal delay of the
/// filter.
pub const PIPELINE_STAGES: usize = 4;

/// Behaviour when a value does not fit in its bit width.
///
/// Hardware registers silently drop the most significant bits, so this
/// defaults to wrapping around.
pub const OVERFLOW: OverflowPolicy = OverflowPolicy::Wrap;
