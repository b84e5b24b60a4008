//! Hydrogen-line spectrum capture and radial-velocity analysis.
//!
//! Two independent front ends share this crate:
//! * `hline` loads a two-column spectrum, finds the peak SNR within
//!   ±120 km/s of the 21 cm line and plots it with a velocity axis.
//! * `hline-acquire` captures samples from a [`acquisition::SampleSource`],
//!   estimates line and noise power and plots the power spectral density.

pub mod acquisition;
pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod doppler;
pub mod error;
pub mod plot;
pub mod state;
pub mod ui;

pub use error::{ConfigError, DeviceError, Error, ParseError, Result};
