//! Named settings for acquisition and viewing, with their units.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

// ---------------------------------------------------------------------------
// Acquisition defaults
// ---------------------------------------------------------------------------

/// Tuner center frequency, Hz.
pub const CENTER_FREQUENCY_HZ: f64 = 1420.4e6;

/// Complex sample rate, samples/s.
pub const SAMPLE_RATE_HZ: f64 = 2.4e6;

/// Complex samples captured per run.
pub const N_SAMPLES: usize = 1 << 18;

/// Frequency tolerance around the line, Hz. Carried for reference, the
/// signal bin is picked by nearest match.
pub const FREQ_TOLERANCE_HZ: f64 = 5000.0;

/// FFT length, bins.
pub const FFT_WINDOW_SIZE: usize = 1 << 14;

/// Linear signal/noise power ratio above which noise is subtracted.
pub const NOISE_THRESHOLD: f64 = 10.0;

// ---------------------------------------------------------------------------
// Analysis defaults
// ---------------------------------------------------------------------------

/// Half width of the peak search window, km/s.
pub const VELOCITY_WINDOW_KM_S: f64 = 120.0;

/// Default plot title.
pub const DEFAULT_TITLE: &str = "Hydrogen line spectrum";

/// Settings for one acquisition run
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Hz
    pub center_frequency_hz: f64,
    /// samples/s
    pub sample_rate_hz: f64,
    pub n_samples: usize,
    pub fft_size: usize,
    /// linear power ratio
    pub noise_threshold: f64,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            center_frequency_hz: CENTER_FREQUENCY_HZ,
            sample_rate_hz: SAMPLE_RATE_HZ,
            n_samples: N_SAMPLES,
            fft_size: FFT_WINDOW_SIZE,
            noise_threshold: NOISE_THRESHOLD,
        }
    }
}

impl AcquisitionConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(ConfigError::Acquisition(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }
        if !self.center_frequency_hz.is_finite() {
            return Err(ConfigError::Acquisition(format!(
                "center frequency must be finite, got {}",
                self.center_frequency_hz
            )));
        }
        if self.n_samples == 0 {
            return Err(ConfigError::Acquisition("sample count must be non-zero".into()));
        }
        if self.fft_size == 0 {
            return Err(ConfigError::Acquisition("FFT size must be non-zero".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Viewer configuration file
// ---------------------------------------------------------------------------

/// Viewer settings, optionally read from a JSON file:
///
/// ```json
/// { "title": "Mounted Parabolic Build", "data_file": "para2.txt",
///   "y_min": 0.0, "y_max": 0.0001 }
/// ```
///
/// `y_min == y_max == 0.0` means autoscale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub title: String,
    pub data_file: Option<PathBuf>,
    pub y_min: f64,
    pub y_max: f64,
    /// km/s
    pub velocity_window_km_s: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            data_file: None,
            y_min: 0.0,
            y_max: 0.0,
            velocity_window_km_s: VELOCITY_WINDOW_KM_S,
        }
    }
}

impl ViewerConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        log::info!("Loaded viewer config from {}", path.display());
        Ok(config)
    }
}
