//! Filter configuration.
//!
//! This module contains [`FilterConfig`], which bundles the parameters of the
//! FIR filter hardware implementation (number of taps, datapath widths and
//! pipeline depth). A `FilterConfig` is immutable and is passed to every
//! component of the reference model.

use crate::codec::{BitWidth, OverflowPolicy};
use crate::error::{Error, Result};

pub mod constants;

/// Filter configuration.
///
/// The configuration is validated on construction: the filter has at least
/// one tap and all the widths are supported by the [codec](crate::codec).
///
/// # Examples
/// ```
/// use firmodel::config::FilterConfig;
/// let config = FilterConfig::default();
/// assert_eq!(config.taps(), 8);
/// assert_eq!(config.coefficient_scale(), 128.0);
/// assert_eq!(config.latency(), 11);
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FilterConfig {
    taps: usize,
    coefficient_width: BitWidth,
    input_width: BitWidth,
    output_width: BitWidth,
    pipeline_stages: usize,
    overflow: OverflowPolicy,
}

impl FilterConfig {
    /// Creates a filter configuration.
    ///
    /// The widths are given in bits. The overflow policy is set to
    /// [`constants::OVERFLOW`] and can be changed with
    /// [`FilterConfig::with_overflow`]. A warning is logged if the output
    /// width is narrower than [`FilterConfig::required_output_bits`].
    pub fn new(
        taps: usize,
        coefficient_bits: u32,
        input_bits: u32,
        output_bits: u32,
        pipeline_stages: usize,
    ) -> Result<FilterConfig> {
        if taps == 0 {
            return Err(Error::NoTaps);
        }
        let config = FilterConfig {
            taps,
            coefficient_width: BitWidth::new(coefficient_bits)?,
            input_width: BitWidth::new(input_bits)?,
            output_width: BitWidth::new(output_bits)?,
            pipeline_stages,
            overflow: constants::OVERFLOW,
        };
        if !config.has_full_precision_output() {
            tracing::warn!(
                output_width = output_bits,
                required = config.required_output_bits(),
                "output width is too narrow for full precision output words"
            );
        }
        Ok(config)
    }

    /// Creates a filter configuration from its JSON schema.
    ///
    /// Fields that are not present in `config` take the defaults in
    /// [`constants`].
    pub fn from_json(config: &firmodel_json::FilterConfig) -> Result<FilterConfig> {
        Ok(FilterConfig::new(
            config.taps.map_or(constants::TAPS, |t| t as usize),
            config
                .coefficient_width
                .unwrap_or(constants::COEFFICIENT_BITS),
            config.input_width.unwrap_or(constants::INPUT_BITS),
            config.output_width.unwrap_or(constants::OUTPUT_BITS),
            config
                .pipeline_stages
                .map_or(constants::PIPELINE_STAGES, |p| p as usize),
        )?
        .with_overflow(config.overflow.unwrap_or(constants::OVERFLOW)))
    }

    /// Returns a copy of the configuration with a different overflow policy.
    pub fn with_overflow(self, overflow: OverflowPolicy) -> FilterConfig {
        FilterConfig { overflow, ..self }
    }

    /// Gives the number of taps (TAPS).
    pub fn taps(&self) -> usize {
        self.taps
    }

    /// Gives the width of the coefficients (N1).
    pub fn coefficient_width(&self) -> BitWidth {
        self.coefficient_width
    }

    /// Gives the width of the input samples (N2).
    pub fn input_width(&self) -> BitWidth {
        self.input_width
    }

    /// Gives the width of the output samples and accumulator (N3).
    pub fn output_width(&self) -> BitWidth {
        self.output_width
    }

    /// Gives the number of pipeline stages of the hardware.
    pub fn pipeline_stages(&self) -> usize {
        self.pipeline_stages
    }

    /// Gives the overflow policy used when encoding values.
    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Gives the coefficient scale factor `2^(N1-1)`.
    pub fn coefficient_scale(&self) -> f64 {
        self.coefficient_width.scale()
    }

    /// Gives the number of reference output samples computed from a partial
    /// window, `TAPS-1`.
    pub fn warmup(&self) -> usize {
        self.taps - 1
    }

    /// Gives the latency of the hardware implementation in samples,
    /// `(TAPS-1) + PIPELINE_STAGES`.
    pub fn latency(&self) -> usize {
        self.warmup() + self.pipeline_stages
    }

    /// Gives the output width needed so that an output word never overflows.
    ///
    /// Each product needs N1 + N2 bits, and adding TAPS products grows the
    /// accumulator by `ceil(log2(TAPS))` bits. The shift by N1-1 bits that
    /// removes the coefficient scale leaves N2 + 1 + `ceil(log2(TAPS))` bits.
    pub fn required_output_bits(&self) -> u32 {
        let growth = usize::BITS - (self.taps - 1).leading_zeros();
        self.input_width.bits() + 1 + growth
    }

    /// Returns `true` if the output width is at least
    /// [`FilterConfig::required_output_bits`].
    pub fn has_full_precision_output(&self) -> bool {
        self.output_width.bits() >= self.required_output_bits()
    }

    /// Returns the JSON summary of this configuration.
    pub fn summary(&self, coefficients: Vec<i64>) -> firmodel_json::FilterSummary {
        let to_u32 = |x: usize| u32::try_from(x).unwrap_or(u32::MAX);
        firmodel_json::FilterSummary {
            taps: to_u32(self.taps),
            coefficient_width: self.coefficient_width.bits(),
            input_width: self.input_width.bits(),
            output_width: self.output_width.bits(),
            pipeline_stages: to_u32(self.pipeline_stages),
            overflow: self.overflow,
            latency: to_u32(self.latency()),
            coefficients,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> FilterConfig {
        FilterConfig {
            taps: constants::TAPS,
            coefficient_width: BitWidth::from_const(constants::COEFFICIENT_BITS),
            input_width: BitWidth::from_const(constants::INPUT_BITS),
            output_width: BitWidth::from_const(constants::OUTPUT_BITS),
            pipeline_stages: constants::PIPELINE_STAGES,
            overflow: constants::OVERFLOW,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.taps(), 8);
        assert_eq!(config.coefficient_width().bits(), 8);
        assert_eq!(config.input_width().bits(), 16);
        assert_eq!(config.output_width().bits(), 32);
        assert_eq!(config.pipeline_stages(), 4);
        assert_eq!(config.overflow(), OverflowPolicy::Wrap);
        assert_eq!(config.warmup(), 7);
        assert_eq!(config.latency(), 11);
        assert_eq!(
            FilterConfig::from_json(&firmodel_json::FilterConfig::default()),
            Ok(config)
        );
    }

    #[test]
    fn from_json() {
        let json = firmodel_json::FilterConfig {
            taps: Some(16),
            coefficient_width: Some(18),
            overflow: Some(OverflowPolicy::Reject),
            ..Default::default()
        };
        let config = FilterConfig::from_json(&json).unwrap();
        assert_eq!(config.taps(), 16);
        assert_eq!(config.coefficient_width().bits(), 18);
        assert_eq!(config.input_width().bits(), constants::INPUT_BITS);
        assert_eq!(config.overflow(), OverflowPolicy::Reject);
        assert_eq!(config.coefficient_scale(), 131072.0);
    }

    #[test]
    fn invalid() {
        assert_eq!(FilterConfig::new(0, 8, 16, 32, 4), Err(Error::NoTaps));
        assert_eq!(
            FilterConfig::new(8, 8, 65, 32, 4),
            Err(Error::UnsupportedWidth(65))
        );
        let json = firmodel_json::FilterConfig {
            output_width: Some(0),
            ..Default::default()
        };
        assert_eq!(
            FilterConfig::from_json(&json),
            Err(Error::UnsupportedWidth(0))
        );
    }

    #[test]
    fn required_output_bits() {
        assert_eq!(FilterConfig::default().required_output_bits(), 20);
        assert!(FilterConfig::default().has_full_precision_output());
        let single = FilterConfig::new(1, 8, 16, 32, 0).unwrap();
        assert_eq!(single.required_output_bits(), 17);
        let nine = FilterConfig::new(9, 8, 16, 32, 0).unwrap();
        assert_eq!(nine.required_output_bits(), 21);
    }

    #[test]
    fn narrow_output() {
        // the same check applies to configurations built with new and
        // from_json
        let config = FilterConfig::new(2, 8, 16, 8, 0).unwrap();
        assert!(!config.has_full_precision_output());
        let json = firmodel_json::FilterConfig {
            taps: Some(2),
            output_width: Some(8),
            ..Default::default()
        };
        let config = FilterConfig::from_json(&json).unwrap();
        assert!(!config.has_full_precision_output());
        assert!(FilterConfig::new(2, 8, 16, 18, 0)
            .unwrap()
            .has_full_precision_output());
    }
}
