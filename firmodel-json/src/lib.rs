//! firmodel-json contains the JSON schemas used by firmodel for its
//! configuration file and its comparison report.

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};

/// Filter configuration JSON schema.
///
/// This JSON schema corresponds to the configuration file given to firmodel
/// with `--config`. All the fields are optional. Fields that are not present
/// take the default values of the filter model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct FilterConfig {
    /// Number of filter taps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taps: Option<u32>,
    /// Width of the filter coefficients in bits (N1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficient_width: Option<u32>,
    /// Width of the filter input samples in bits (N2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_width: Option<u32>,
    /// Width of the filter output (accumulator) in bits (N3).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_width: Option<u32>,
    /// Number of pipeline stages of the hardware implementation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_stages: Option<u32>,
    /// Behaviour when a value does not fit in its bit width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<OverflowPolicy>,
}

/// Overflow policy.
///
/// This enum lists the ways in which a value that does not fit in the
/// destination bit width can be handled when it is encoded. It is spelled in
/// lowercase both in JSON and in its string conversions.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Wrap around modulo 2^width, as a hardware register truncation does.
    Wrap,
    /// Clamp to the minimum or maximum representable value.
    Saturate,
    /// Fail with an error.
    Reject,
}

impl std::str::FromStr for OverflowPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        Ok(match s {
            "wrap" => OverflowPolicy::Wrap,
            "saturate" => OverflowPolicy::Saturate,
            "reject" => OverflowPolicy::Reject,
            _ => return Err(()),
        })
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                OverflowPolicy::Wrap => "wrap",
                OverflowPolicy::Saturate => "saturate",
                OverflowPolicy::Reject => "reject",
            }
        )
    }
}

/// Comparison report JSON schema.
///
/// This JSON schema is the report written by firmodel after running the
/// reference model and, optionally, comparing it against the hardware output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Report {
    /// Version of firmodel that produced the report.
    pub version: String,
    /// Date and time at which the report was produced, in RFC 3339 format.
    pub datetime: String,
    /// Filter configuration used.
    pub filter: FilterSummary,
    /// Number of input samples.
    pub input_length: u64,
    /// Number of reference output samples.
    pub reference_length: u64,
    /// Comparison against the hardware output.
    ///
    /// This is `None` if no hardware output was given.
    pub comparison: Option<Comparison>,
}

/// Filter configuration summary JSON schema.
///
/// This contains the fully resolved filter configuration, with defaults
/// applied, as well as the derived latency values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSummary {
    /// Number of filter taps.
    pub taps: u32,
    /// Width of the filter coefficients in bits (N1).
    pub coefficient_width: u32,
    /// Width of the filter input samples in bits (N2).
    pub input_width: u32,
    /// Width of the filter output in bits (N3).
    pub output_width: u32,
    /// Number of pipeline stages of the hardware implementation.
    pub pipeline_stages: u32,
    /// Overflow policy used when encoding.
    pub overflow: OverflowPolicy,
    /// Total latency of the hardware implementation in samples.
    pub latency: u32,
    /// Quantized filter coefficients.
    pub coefficients: Vec<i64>,
}

/// Comparison JSON schema.
///
/// This contains the fidelity metrics obtained by comparing the reference
/// output with the hardware output after latency alignment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Number of hardware output samples.
    pub hardware_length: u64,
    /// Number of samples compared after alignment.
    pub aligned_length: u64,
    /// Mean power of the aligned reference output.
    pub signal_power: f64,
    /// Mean power of the error.
    pub error_power: f64,
    /// Signal to noise ratio in dB.
    ///
    /// This is `None` when the error power is zero.
    pub snr_db: Option<f64>,
    /// Indicates that the error power is zero and the SNR is not defined.
    pub snr_degenerate: bool,
    /// Maximum absolute error.
    pub max_abs_error: f64,
    /// Index (in the aligned sequences) of the maximum absolute error.
    pub max_abs_error_index: u64,
    /// Mean absolute error.
    pub mean_abs_error: f64,
    /// Mean relative error.
    pub mean_relative_error: f64,
}
