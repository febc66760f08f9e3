//! firmodel CLI arguments.
//!
//! This module contains the definition of the CLI arguments for the firmodel
//! application. The filter parameters are not given as arguments. They are
//! read from the configuration file.

use clap::Parser;
use std::path::PathBuf;

/// firmodel CLI arguments.
#[derive(Parser, Debug, Clone, Eq, PartialEq, Hash)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Input samples (one real number per line)
    #[clap(long)]
    pub input: PathBuf,
    /// Filter configuration (JSON)
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Quantized filter coefficients (one binary string per line)
    #[clap(long, conflicts_with = "real_coefficients")]
    pub coefficients: Option<PathBuf>,
    /// Real filter coefficients (one real number per line)
    ///
    /// If neither this nor --coefficients is given, a moving average filter is
    /// used.
    #[clap(long)]
    pub real_coefficients: Option<PathBuf>,
    /// Hardware filter output (one binary string per line)
    #[clap(long)]
    pub hardware_output: Option<PathBuf>,
    /// Write the quantized filter coefficients to this file
    #[clap(long)]
    pub write_coefficients: Option<PathBuf>,
    /// Write the quantized input samples to this file
    #[clap(long)]
    pub write_samples: Option<PathBuf>,
    /// Write the reference filter output to this file
    #[clap(long)]
    pub write_reference: Option<PathBuf>,
    /// Run the reference model on the quantized input samples
    #[clap(long)]
    pub quantized_input: bool,
    /// Write the JSON report to this file instead of the standard output
    #[clap(long)]
    pub report: Option<PathBuf>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse() {
        let args = Args::try_parse_from([
            "firmodel",
            "--input",
            "input.txt",
            "--hardware-output",
            "save.data.txt",
            "--quantized-input",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("input.txt"));
        assert_eq!(args.hardware_output, Some(PathBuf::from("save.data.txt")));
        assert!(args.quantized_input);
        assert_eq!(args.config, None);
    }

    #[test]
    fn conflicting_coefficients() {
        assert!(Args::try_parse_from([
            "firmodel",
            "--input",
            "input.txt",
            "--coefficients",
            "coeff.data.txt",
            "--real-coefficients",
            "coeff.txt",
        ])
        .is_err());
        assert!(Args::try_parse_from(["firmodel"]).is_err());
    }
}
