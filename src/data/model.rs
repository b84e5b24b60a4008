use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Spectrum – one loaded observation
// ---------------------------------------------------------------------------

/// A single observed spectrum: two parallel columns of equal length.
///
/// Rows are expected in ascending frequency order. This is not checked on
/// load; the peak search relies on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spectrum {
    /// Frequency axis (x), Hz.
    pub frequency: Vec<f64>,
    /// Relative intensity (y), dB – same length as `frequency`.
    pub intensity: Vec<f64>,
}

impl Spectrum {
    /// Build from two columns, rejecting a length mismatch.
    pub fn new(frequency: Vec<f64>, intensity: Vec<f64>) -> Result<Self, ConfigError> {
        if frequency.len() != intensity.len() {
            return Err(ConfigError::LengthMismatch {
                frequencies: frequency.len(),
                intensities: intensity.len(),
            });
        }
        Ok(Self {
            frequency,
            intensity,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    /// Whether the spectrum is empty.
    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// First and last frequency, as loaded.
    pub fn frequency_span(&self) -> Option<(f64, f64)> {
        Some((*self.frequency.first()?, *self.frequency.last()?))
    }

    /// (frequency, intensity) pairs for plotting.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.frequency
            .iter()
            .zip(&self.intensity)
            .map(|(&f, &i)| [f, i])
            .collect()
    }
}
