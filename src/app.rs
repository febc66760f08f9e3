//! firmodel application.
//!
//! This module contains a top-level structure [`App`] that represents the whole
//! firmodel application. It reads the input files given in the [`Args`], runs
//! the reference model, compares it with the hardware output, and writes the
//! output files and the JSON report.

use crate::{
    args::Args,
    compare::{compare, rescale_hardware},
    config::FilterConfig,
    fir::FirFilter,
    interchange::{parse_binary_lines, parse_real_lines, write_binary_lines, write_real_lines},
    quantizer::{dequantize_samples, moving_average, quantize_coefficients, quantize_samples},
};
use anyhow::{Context, Result};
use chrono::prelude::*;
use std::path::Path;

const VERSION: &str = concat!("firmodel v", env!("CARGO_PKG_VERSION"));

/// firmodel application.
///
/// This struct owns the filter model and the sequences read from the input
/// files.
#[derive(Debug)]
pub struct App {
    args: Args,
    fir: FirFilter,
    input: Vec<f64>,
    hardware: Option<Vec<f64>>,
}

impl App {
    /// Creates a new application.
    ///
    /// This reads the filter configuration, the filter coefficients, the input
    /// samples and the hardware output, if they are given in `args`.
    #[tracing::instrument(name = "App::new", level = "debug", skip_all)]
    pub async fn new(args: &Args) -> Result<App> {
        let config = match &args.config {
            Some(path) => {
                let json: firmodel_json::FilterConfig = serde_json::from_str(&read(path).await?)
                    .with_context(|| format!("failed to parse {}", path.display()))?;
                FilterConfig::from_json(&json)
                    .with_context(|| format!("invalid filter configuration in {}", path.display()))?
            }
            None => FilterConfig::default(),
        };
        tracing::info!(
            taps = config.taps(),
            coefficient_width = config.coefficient_width().bits(),
            input_width = config.input_width().bits(),
            output_width = config.output_width().bits(),
            latency = config.latency(),
            overflow = %config.overflow(),
            "filter configuration"
        );

        let coefficients = if let Some(path) = &args.coefficients {
            parse_binary_lines(&read(path).await?, config.coefficient_width())
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            let real = match &args.real_coefficients {
                Some(path) => parse_real_lines(&read(path).await?)
                    .with_context(|| format!("failed to parse {}", path.display()))?,
                None => moving_average(config.taps()),
            };
            quantize_coefficients(&real, &config).context("failed to quantize coefficients")?
        };
        let fir = FirFilter::new(coefficients, &config).context("invalid filter coefficients")?;
        tracing::debug!(
            coefficients = ?fir.coefficients().iter().map(|h| h.value()).collect::<Vec<_>>(),
            "quantized coefficients"
        );

        let input = parse_real_lines(&read(&args.input).await?)
            .with_context(|| format!("failed to parse {}", args.input.display()))?;

        let hardware = match &args.hardware_output {
            Some(path) => {
                let words = parse_binary_lines(&read(path).await?, config.output_width())
                    .with_context(|| format!("failed to parse {}", path.display()))?
                    .iter()
                    .map(|y| y.value())
                    .collect::<Vec<_>>();
                Some(rescale_hardware(&words, &config))
            }
            None => None,
        };

        Ok(App {
            args: args.clone(),
            fir,
            input,
            hardware,
        })
    }

    /// Runs the application.
    ///
    /// This writes the requested output files and the JSON report. It fails if
    /// the hardware output cannot be aligned with the reference output.
    #[tracing::instrument(name = "App::run", level = "debug", skip_all)]
    pub async fn run(self) -> Result<()> {
        let report = self.process().await?;
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n'); // to_string_pretty does not include a final \n
        match &self.args.report {
            Some(path) => write(path, json).await,
            None => {
                print!("{json}");
                Ok(())
            }
        }
    }

    async fn process(&self) -> Result<firmodel_json::Report> {
        let config = *self.fir.config();

        if let Some(path) = &self.args.write_coefficients {
            write(path, write_binary_lines(self.fir.coefficients())).await?;
        }

        let samples = if self.args.quantized_input || self.args.write_samples.is_some() {
            Some(quantize_samples(&self.input, &config).context("failed to quantize input samples")?)
        } else {
            None
        };
        if let (Some(path), Some(samples)) = (&self.args.write_samples, &samples) {
            write(path, write_binary_lines(samples)).await?;
        }

        let reference = match &samples {
            Some(samples) if self.args.quantized_input => {
                self.fir.convolve(&dequantize_samples(samples, &config))
            }
            _ => self.fir.convolve(&self.input),
        };
        tracing::info!(
            input_length = self.input.len(),
            reference_length = reference.len(),
            "reference model done"
        );
        if let Some(path) = &self.args.write_reference {
            write(path, write_real_lines(&reference)).await?;
        }

        let comparison = match &self.hardware {
            Some(hardware) => {
                let comparison = compare(&reference, hardware, &config)
                    .context("failed to compare reference and hardware outputs")?;
                let m = &comparison.metrics;
                tracing::info!(
                    signal_power = m.signal_power,
                    error_power = m.error_power,
                    snr = %m.snr,
                    max_abs_error = m.max_abs_error,
                    mean_abs_error = m.mean_abs_error,
                    mean_relative_error = m.mean_relative_error,
                    "comparison done"
                );
                if m.snr.is_degenerate() {
                    tracing::info!("hardware output matches the reference exactly");
                }
                Some(comparison.to_json())
            }
            None => None,
        };

        Ok(firmodel_json::Report {
            version: VERSION.to_string(),
            datetime: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            filter: config.summary(self.fir.coefficients().iter().map(|h| h.value()).collect()),
            input_length: self.input.len() as u64,
            reference_length: reference.len() as u64,
            comparison,
        })
    }
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn write(path: &Path, contents: String) -> Result<()> {
    tracing::debug!(path = %path.display(), "writing file");
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}
