//! firmodel is a bit-exact fixed-point reference model of an N-tap FIR
//! filter. It is used to verify a hardware (RTL) implementation of the filter
//! by comparing the output of its simulation with the output of a software
//! model that uses the same fixed-point arithmetic.
//!
//! The library is formed by a fixed-point [codec], a coefficient and sample
//! [quantizer], the [FIR filter model](fir), and the [comparison](compare)
//! of the model output with the hardware output. The [app] module contains
//! the command line application that reads and writes the sequences exchanged
//! with the RTL simulation.

#![warn(missing_docs)]

pub mod app;
pub mod args;
pub mod codec;
pub mod compare;
pub mod config;
pub mod error;
pub mod fir;
pub mod interchange;
pub mod quantizer;

pub use error::{Error, Result};
