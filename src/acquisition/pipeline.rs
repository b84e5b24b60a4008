//! Capture → FFT → signal and noise power.

use rustfft::num_complex::{Complex, Complex32};
use rustfft::FftPlanner;

use crate::analysis::nearest_index;
use crate::config::AcquisitionConfig;
use crate::data::model::Spectrum;
use crate::error::{DeviceError, Result};

use super::source::SampleSource;

/// FFT-shifted power per bin.
#[derive(Debug, Clone, Default)]
pub struct PowerSpectrum {
    /// Absolute bin frequencies, Hz, ascending.
    pub frequency_hz: Vec<f64>,
    /// Linear power `|X[k]|²`.
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    pub fn frequency_mhz(&self) -> Vec<f64> {
        self.frequency_hz.iter().map(|f| f / 1e6).collect()
    }

    /// `10·log10(power)`; empty bins are floored instead of going to -inf.
    pub fn power_db(&self) -> Vec<f64> {
        self.power
            .iter()
            .map(|p| 10.0 * p.max(f64::MIN_POSITIVE).log10())
            .collect()
    }

    /// Mean power over all bins.
    pub fn mean_power(&self) -> f64 {
        if self.power.is_empty() {
            return 0.0;
        }
        self.power.iter().sum::<f64>() / self.power.len() as f64
    }

    /// Bin with the highest power; first one on ties.
    pub fn strongest_bin(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.power.iter().enumerate() {
            if best.map_or(true, |(_, current)| p > current) {
                best = Some((i, p));
            }
        }
        best.map(|(i, _)| i)
    }

    /// As a two-column spectrum (Hz, dB) for writing to disk.
    pub fn to_spectrum(&self) -> Spectrum {
        Spectrum {
            frequency: self.frequency_hz.clone(),
            intensity: self.power_db(),
        }
    }
}

/// FFT of the first `fft_size` samples (zero-padded when fewer), shifted so
/// the bins run from `center - rate/2` upwards.
pub fn compute_power_spectrum(
    samples: &[Complex32],
    fft_size: usize,
    center_frequency_hz: f64,
    sample_rate_hz: f64,
) -> PowerSpectrum {
    if fft_size == 0 {
        return PowerSpectrum::default();
    }

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .take(fft_size)
        .map(|s| Complex::new(s.re as f64, s.im as f64))
        .collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(fft_size).process(&mut buffer);

    let mut power: Vec<f64> = buffer.iter().map(|x| x.norm_sqr()).collect();
    power.rotate_right(fft_size / 2);

    let half = (fft_size / 2) as f64;
    let bin_width = sample_rate_hz / fft_size as f64;
    let frequency_hz = (0..fft_size)
        .map(|i| center_frequency_hz + (i as f64 - half) * bin_width)
        .collect();

    PowerSpectrum {
        frequency_hz,
        power,
    }
}

/// Signal power with the mean noise power removed, when the signal stands
/// far enough above it.
///
/// Returns `None` when `signal / noise` does not exceed `threshold`. The
/// result is informational only; nothing downstream consumes it.
pub fn reduce_noise(signal_power: f64, noise_power: f64, threshold: f64) -> Option<f64> {
    if signal_power / noise_power > threshold {
        Some(signal_power - noise_power)
    } else {
        None
    }
}

/// Outcome of one capture.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub spectrum: PowerSpectrum,
    /// Bin nearest the configured center frequency.
    pub signal_bin: usize,
    pub signal_power: f64,
    /// Mean power over all bins.
    pub noise_power: f64,
    /// See [`reduce_noise`].
    pub noise_reduced_power: Option<f64>,
}

impl Acquisition {
    /// Linear signal-to-noise power ratio.
    pub fn snr(&self) -> f64 {
        self.signal_power / self.noise_power
    }
}

/// Configure `source`, capture, and analyse one block of samples.
pub fn acquire<S: SampleSource + ?Sized>(source: &mut S, config: &AcquisitionConfig) -> Result<Acquisition> {
    config.validate()?;

    source.configure(config.center_frequency_hz, config.sample_rate_hz)?;
    log::info!(
        "Configured source: center {:.4} MHz, rate {:.3} MS/s",
        config.center_frequency_hz / 1e6,
        config.sample_rate_hz / 1e6
    );

    let samples = source.read_samples(config.n_samples)?;
    if samples.len() < config.n_samples {
        return Err(DeviceError::ShortRead {
            requested: config.n_samples,
            received: samples.len(),
        }
        .into());
    }
    log::debug!("Captured {} samples", samples.len());

    let spectrum = compute_power_spectrum(
        &samples,
        config.fft_size,
        config.center_frequency_hz,
        config.sample_rate_hz,
    );

    let signal_bin = nearest_index(&spectrum.frequency_hz, config.center_frequency_hz);
    let signal_power = spectrum.power[signal_bin];
    let noise_power = spectrum.mean_power();

    let noise_reduced_power = reduce_noise(signal_power, noise_power, config.noise_threshold);
    match noise_reduced_power {
        Some(adjusted) => log::info!("Signal {signal_power:.3e} above noise {noise_power:.3e}; adjusted {adjusted:.3e}"),
        None => log::warn!(
            "Signal/noise {:.2} below threshold {}; no noise subtraction",
            signal_power / noise_power,
            config.noise_threshold
        ),
    }

    Ok(Acquisition {
        spectrum,
        signal_bin,
        signal_power,
        noise_power,
        noise_reduced_power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::source::SyntheticSource;
    use crate::error::Error;

    fn small_config() -> AcquisitionConfig {
        AcquisitionConfig {
            center_frequency_hz: 1420.4e6,
            sample_rate_hz: 2.4e6,
            n_samples: 4096,
            fft_size: 1024,
            noise_threshold: 10.0,
        }
    }

    #[test]
    fn shifted_bin_frequencies() {
        let ps = compute_power_spectrum(&[Complex32::new(1.0, 0.0); 4], 4, 100.0, 8.0);
        assert_eq!(ps.frequency_hz, vec![96.0, 98.0, 100.0, 102.0]);
        // DC input lands in the center bin after the shift
        assert_eq!(ps.strongest_bin(), Some(2));
        assert!((ps.power[2] - 16.0).abs() < 1e-9);
    }

    #[test]
    fn odd_length_shift() {
        let ps = compute_power_spectrum(&[Complex32::new(1.0, 0.0); 5], 5, 0.0, 5.0);
        assert_eq!(ps.frequency_hz, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(ps.strongest_bin(), Some(2));
    }

    #[test]
    fn zero_pads_short_input() {
        let ps = compute_power_spectrum(&[Complex32::new(1.0, 0.0); 2], 8, 0.0, 8.0);
        assert_eq!(ps.len(), 8);
        assert!((ps.power[4] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn tone_lands_in_its_bin() {
        let cfg = small_config();
        let bin_width = cfg.sample_rate_hz / cfg.fft_size as f64;
        let tone = cfg.center_frequency_hz + 37.0 * bin_width;
        let mut src = SyntheticSource::new(tone, 1.0, 0.01, 3);

        let acq = acquire(&mut src, &cfg).unwrap();
        let peak = acq.spectrum.strongest_bin().unwrap();
        assert_eq!(peak, cfg.fft_size / 2 + 37);
        assert!((acq.spectrum.frequency_hz[peak] - tone).abs() < 1e-3);
        assert_eq!(acq.signal_bin, cfg.fft_size / 2);
    }

    #[test]
    fn strong_center_signal_is_noise_reduced() {
        let cfg = small_config();
        let mut src = SyntheticSource::new(cfg.center_frequency_hz, 1.0, 0.0, 3);

        let acq = acquire(&mut src, &cfg).unwrap();
        let n = cfg.fft_size as f64;
        assert!((acq.signal_power - n * n).abs() / (n * n) < 1e-3);
        assert!((acq.noise_power - n).abs() / n < 1e-3);
        assert!(acq.snr() > cfg.noise_threshold);
        let adjusted = acq.noise_reduced_power.unwrap();
        assert!((adjusted - (acq.signal_power - acq.noise_power)).abs() < 1e-6);
    }

    #[test]
    fn weak_center_signal_is_left_alone() {
        let cfg = small_config();
        let tone = cfg.center_frequency_hz + 100.0 * cfg.sample_rate_hz / cfg.fft_size as f64;
        let mut src = SyntheticSource::new(tone, 1.0, 0.05, 11);

        let acq = acquire(&mut src, &cfg).unwrap();
        assert!(acq.snr() < cfg.noise_threshold);
        assert_eq!(acq.noise_reduced_power, None);
    }

    #[test]
    fn reduce_noise_threshold_is_strict() {
        assert_eq!(reduce_noise(100.0, 10.0, 10.0), None);
        assert_eq!(reduce_noise(101.0, 10.0, 10.0), Some(91.0));
    }

    struct FailingSource;

    impl SampleSource for FailingSource {
        fn configure(&mut self, _: f64, _: f64) -> std::result::Result<(), DeviceError> {
            Ok(())
        }

        fn read_samples(&mut self, _: usize) -> std::result::Result<Vec<Complex32>, DeviceError> {
            Err(DeviceError::Read("usb transfer failed".into()))
        }
    }

    struct ShortSource;

    impl SampleSource for ShortSource {
        fn configure(&mut self, _: f64, _: f64) -> std::result::Result<(), DeviceError> {
            Ok(())
        }

        fn read_samples(&mut self, count: usize) -> std::result::Result<Vec<Complex32>, DeviceError> {
            Ok(vec![Complex32::new(0.0, 0.0); count / 2])
        }
    }

    #[test]
    fn device_errors_propagate() {
        let err = acquire(&mut FailingSource, &small_config()).unwrap_err();
        assert!(matches!(err, Error::Device(DeviceError::Read(_))));

        let err = acquire(&mut ShortSource, &small_config()).unwrap_err();
        assert!(matches!(
            err,
            Error::Device(DeviceError::ShortRead {
                requested: 4096,
                received: 2048
            })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_capture() {
        let cfg = AcquisitionConfig {
            fft_size: 0,
            ..small_config()
        };
        let mut src = SyntheticSource::new(1.4204e9, 1.0, 0.0, 1);
        assert!(matches!(acquire(&mut src, &cfg), Err(Error::Config(_))));
        assert_eq!(src.tuning(), None);
    }

    #[test]
    fn boxed_source_works() {
        let mut src: Box<dyn SampleSource> = Box::new(SyntheticSource::new(1420.4e6, 1.0, 0.0, 1));
        let acq = acquire(&mut src, &small_config()).unwrap();
        assert_eq!(acq.spectrum.len(), 1024);
    }

    #[test]
    fn db_conversion_floors_empty_bins() {
        let ps = PowerSpectrum {
            frequency_hz: vec![1.0, 2.0],
            power: vec![100.0, 0.0],
        };
        let db = ps.power_db();
        assert!((db[0] - 20.0).abs() < 1e-12);
        assert!(db[1].is_finite());
        assert_eq!(ps.to_spectrum().frequency, vec![1.0, 2.0]);
    }
}
