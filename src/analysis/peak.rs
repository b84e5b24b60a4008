//! Peak SNR search inside a radial-velocity window.
//!
//! The window edges are turned into frequencies with the Doppler relation
//! and then into array indices by nearest-frequency match on the (sorted)
//! frequency axis. The strongest sample in that index range is reported
//! together with its radial velocity.

use crate::config::VELOCITY_WINDOW_KM_S;
use crate::data::model::Spectrum;
use crate::doppler::{round_to, DopplerConverter};
use crate::error::ConfigError;

/// Radial-velocity search range, km/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityWindow {
    pub min_km_s: f64,
    pub max_km_s: f64,
}

impl VelocityWindow {
    pub fn new(min_km_s: f64, max_km_s: f64) -> Self {
        Self { min_km_s, max_km_s }
    }

    /// Window symmetric about zero velocity.
    pub fn symmetric(half_width_km_s: f64) -> Self {
        Self::new(-half_width_km_s, half_width_km_s)
    }
}

impl Default for VelocityWindow {
    fn default() -> Self {
        Self::symmetric(VELOCITY_WINDOW_KM_S)
    }
}

/// The strongest sample found in the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakResult {
    /// Peak intensity, dB, rounded to 2 decimals.
    pub snr_db: f64,
    /// Radial velocity of the peak, km/s, rounded to 2 decimals.
    pub radial_velocity_km_s: f64,
    /// Frequency of the peak sample as loaded.
    pub frequency_hz: f64,
    /// Index of the peak sample in the spectrum.
    pub index: usize,
}

/// Peak search configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakFinder {
    converter: DopplerConverter,
    window: VelocityWindow,
}

impl PeakFinder {
    /// Hydrogen-line converter with the default ±120 km/s window
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the velocity window
    pub fn with_window(mut self, window: VelocityWindow) -> Self {
        self.window = window;
        self
    }

    /// Set the Doppler reference
    pub fn with_converter(mut self, converter: DopplerConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Half-open index range `[min, max)` covered by the velocity window.
    ///
    /// Positive velocity means lower frequency, so the upper velocity bound
    /// gives the lower index.
    pub fn index_range(&self, frequencies: &[f64]) -> Result<(usize, usize), ConfigError> {
        if frequencies.is_empty() {
            return Err(ConfigError::EmptySpectrum);
        }
        let low_freq = self.converter.frequency(self.window.max_km_s);
        let high_freq = self.converter.frequency(self.window.min_km_s);

        let min_index = nearest_index(frequencies, low_freq);
        let max_index = nearest_index(frequencies, high_freq);
        log::debug!(
            "Velocity window {:?} -> {low_freq:.1}..{high_freq:.1} Hz -> indices {min_index}..{max_index}",
            self.window
        );

        if min_index > max_index {
            return Err(ConfigError::InvertedWindow {
                min_index,
                max_index,
            });
        }
        if min_index == max_index {
            return Err(ConfigError::EmptyWindow { index: min_index });
        }
        Ok((min_index, max_index))
    }

    /// Find the strongest sample inside the window.
    ///
    /// Ties resolve to the lowest index. NaN intensities are ignored.
    pub fn find_peak(&self, spectrum: &Spectrum) -> Result<PeakResult, ConfigError> {
        if spectrum.frequency.len() != spectrum.intensity.len() {
            return Err(ConfigError::LengthMismatch {
                frequencies: spectrum.frequency.len(),
                intensities: spectrum.intensity.len(),
            });
        }
        let (min_index, max_index) = self.index_range(&spectrum.frequency)?;

        let mut best: Option<(usize, f64)> = None;
        for (offset, &value) in spectrum.intensity[min_index..max_index].iter().enumerate() {
            if value.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, current)| value > current) {
                best = Some((min_index + offset, value));
            }
        }
        let (index, snr) = best.ok_or(ConfigError::EmptyWindow { index: min_index })?;

        let frequency_hz = spectrum.frequency[index];
        let velocity = self.converter.radial_velocity(frequency_hz);

        Ok(PeakResult {
            snr_db: round_to(snr, 2),
            radial_velocity_km_s: round_to(velocity, 2),
            frequency_hz,
            index,
        })
    }
}

/// Index of the sample closest to `target` in an ascending slice.
///
/// Equal distances resolve to the lower index, and repeated frequency
/// values resolve to their first occurrence.
pub fn nearest_index(sorted: &[f64], target: f64) -> usize {
    let upper = sorted.partition_point(|&f| f < target);
    let chosen = if upper == 0 {
        0
    } else if upper == sorted.len() {
        sorted.len() - 1
    } else {
        let below = sorted[upper - 1];
        let above = sorted[upper];
        if (target - below).abs() <= (above - target).abs() {
            upper - 1
        } else {
            upper
        }
    };
    let value = sorted[chosen];
    sorted.partition_point(|&f| f < value)
}
