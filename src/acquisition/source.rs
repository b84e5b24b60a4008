//! Sample sources: the device side of an acquisition.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rustfft::num_complex::Complex32;

use crate::error::DeviceError;

/// Anything that can be tuned and then deliver complex baseband samples.
pub trait SampleSource {
    /// Tune to `center_frequency_hz` and set the sample rate.
    fn configure(&mut self, center_frequency_hz: f64, sample_rate_hz: f64) -> Result<(), DeviceError>;

    /// Capture `count` complex samples.
    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError>;
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn configure(&mut self, center_frequency_hz: f64, sample_rate_hz: f64) -> Result<(), DeviceError> {
        (**self).configure(center_frequency_hz, sample_rate_hz)
    }

    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
        (**self).read_samples(count)
    }
}

// ---------------------------------------------------------------------------
// Synthetic source
// ---------------------------------------------------------------------------

/// A complex tone in Gaussian noise, mixed down like a tuner would.
///
/// Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    /// Absolute tone frequency, Hz.
    pub tone_frequency_hz: f64,
    pub amplitude: f64,
    /// Per-component standard deviation of the noise.
    pub noise_std: f64,
    rng: StdRng,
    tuning: Option<(f64, f64)>,
}

impl SyntheticSource {
    pub fn new(tone_frequency_hz: f64, amplitude: f64, noise_std: f64, seed: u64) -> Self {
        Self {
            tone_frequency_hz,
            amplitude,
            noise_std,
            rng: StdRng::seed_from_u64(seed),
            tuning: None,
        }
    }

    /// Center frequency and sample rate set by the last `configure`.
    pub fn tuning(&self) -> Option<(f64, f64)> {
        self.tuning
    }
}

impl SampleSource for SyntheticSource {
    fn configure(&mut self, center_frequency_hz: f64, sample_rate_hz: f64) -> Result<(), DeviceError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(DeviceError::Configure(format!(
                "unsupported sample rate {sample_rate_hz}"
            )));
        }
        self.tuning = Some((center_frequency_hz, sample_rate_hz));
        Ok(())
    }

    fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
        let (center, rate) = self
            .tuning
            .ok_or_else(|| DeviceError::Read("source not configured".into()))?;
        let noise = Normal::new(0.0, self.noise_std)
            .map_err(|e| DeviceError::Configure(format!("noise std {}: {e}", self.noise_std)))?;
        let offset = self.tone_frequency_hz - center;
        let step = 2.0 * std::f64::consts::PI * offset / rate;

        let samples = (0..count)
            .map(|n| {
                let phase = step * n as f64;
                let re = self.amplitude * phase.cos() + noise.sample(&mut self.rng);
                let im = self.amplitude * phase.sin() + noise.sample(&mut self.rng);
                Complex32::new(re as f32, im as f32)
            })
            .collect();
        Ok(samples)
    }
}

// ---------------------------------------------------------------------------
// RTL-SDR through seify
// ---------------------------------------------------------------------------

#[cfg(feature = "rtlsdr")]
pub use self::rtlsdr::RtlSdrSource;

#[cfg(feature = "rtlsdr")]
mod rtlsdr {
    use rustfft::num_complex::Complex32;
    use seify::{Args, Device, DeviceTrait, Direction::Rx, GenericDevice, RxStreamer};

    use super::SampleSource;
    use crate::error::DeviceError;

    /// Read timeout per streamer call, µs.
    const READ_TIMEOUT_US: i64 = 2_000_000;

    /// Channel 0 of an RTL-SDR dongle opened through seify.
    pub struct RtlSdrSource {
        device: Device<GenericDevice>,
    }

    impl std::fmt::Debug for RtlSdrSource {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RtlSdrSource").finish_non_exhaustive()
        }
    }

    impl RtlSdrSource {
        /// Open the first device matching `args` (e.g. `"driver=rtlsdr"`).
        pub fn open(args: &str) -> Result<Self, DeviceError> {
            let device = Device::from_args(args).map_err(|e| DeviceError::Open(e.to_string()))?;
            log::info!("Opened SDR device: {:?}", device.driver());
            Ok(Self { device })
        }
    }

    impl SampleSource for RtlSdrSource {
        fn configure(&mut self, center_frequency_hz: f64, sample_rate_hz: f64) -> Result<(), DeviceError> {
            self.device
                .set_frequency(Rx, 0, center_frequency_hz, Args::new())
                .map_err(|e| DeviceError::Configure(e.to_string()))?;
            self.device
                .set_sample_rate(Rx, 0, sample_rate_hz)
                .map_err(|e| DeviceError::Configure(e.to_string()))?;
            Ok(())
        }

        fn read_samples(&mut self, count: usize) -> Result<Vec<Complex32>, DeviceError> {
            let read_err = |e: seify::Error| DeviceError::Read(e.to_string());

            let mut rx = self.device.rx_stream(&[0]).map_err(read_err)?;
            rx.activate(None).map_err(read_err)?;

            let mut buf = vec![Complex32::new(0.0, 0.0); count];
            let mut filled = 0;
            while filled < count {
                let n = rx.read(&mut [&mut buf[filled..]], READ_TIMEOUT_US).map_err(read_err)?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            rx.deactivate(None).map_err(read_err)?;

            if filled < count {
                return Err(DeviceError::ShortRead {
                    requested: count,
                    received: filled,
                });
            }
            Ok(buf)
        }
    }
}
