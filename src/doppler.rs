//! Radio-Doppler conversion between frequency and radial velocity.
//!
//! Uses the radio convention `v = c·(f0 − f)/f0`, which is linear in `f`
//! and therefore exactly invertible: `f = f0·(1 − v/c)`.

/// Rest frequency of the neutral hydrogen 21 cm line, Hz.
pub const H_LINE_FREQUENCY_HZ: f64 = 1_420_405_750.0;

/// Speed of light, km/s.
pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

/// Frequency ↔ radial velocity conversion about a rest frequency.
///
/// Inputs are not range checked: velocities beyond `c` or negative
/// frequencies come out of the formula unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DopplerConverter {
    /// Reference (rest) frequency, Hz.
    pub rest_frequency_hz: f64,
    /// Speed of light, km/s.
    pub speed_of_light_km_s: f64,
}

impl DopplerConverter {
    /// Converter referenced to the hydrogen line.
    pub const HYDROGEN: Self = Self::new(H_LINE_FREQUENCY_HZ, SPEED_OF_LIGHT_KM_S);

    pub const fn new(rest_frequency_hz: f64, speed_of_light_km_s: f64) -> Self {
        Self {
            rest_frequency_hz,
            speed_of_light_km_s,
        }
    }

    /// Radial velocity (km/s) of a signal observed at `frequency_hz`.
    /// Positive values recede (frequency below rest).
    pub fn radial_velocity(&self, frequency_hz: f64) -> f64 {
        self.speed_of_light_km_s * (self.rest_frequency_hz - frequency_hz) / self.rest_frequency_hz
    }

    /// Observed frequency (Hz) for a radial velocity in km/s.
    pub fn frequency(&self, radial_velocity_km_s: f64) -> f64 {
        self.rest_frequency_hz * (1.0 - radial_velocity_km_s / self.speed_of_light_km_s)
    }
}

impl Default for DopplerConverter {
    fn default() -> Self {
        Self::HYDROGEN
    }
}

/// Hydrogen-line radial velocity from frequency. Plain `fn` so it can be
/// passed where a function pointer is expected (plot axis transforms).
pub fn radial_vel_from_freq(frequency_hz: f64) -> f64 {
    DopplerConverter::HYDROGEN.radial_velocity(frequency_hz)
}

/// Inverse of [`radial_vel_from_freq`].
pub fn freq_from_radial_vel(radial_velocity_km_s: f64) -> f64 {
    DopplerConverter::HYDROGEN.frequency(radial_velocity_km_s)
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
