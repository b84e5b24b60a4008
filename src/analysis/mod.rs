//! Spectrum analysis: peak SNR and radial velocity.

pub mod peak;

pub use peak::{nearest_index, PeakFinder, PeakResult, VelocityWindow};
