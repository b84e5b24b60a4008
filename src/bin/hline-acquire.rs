//! Capture one block of samples near the hydrogen line and plot its PSD.
//!
//! Without the `rtlsdr` feature only the synthetic source is available.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use hline::acquisition::{acquire, Acquisition, SampleSource, SyntheticSource};
use hline::app::FigureApp;
use hline::config::{
    AcquisitionConfig, CENTER_FREQUENCY_HZ, FFT_WINDOW_SIZE, NOISE_THRESHOLD, N_SAMPLES, SAMPLE_RATE_HZ,
};
use hline::data::loader::write_spectrum;
use hline::doppler::H_LINE_FREQUENCY_HZ;
use hline::plot::psd_figure;

#[derive(Parser, Debug)]
#[command(name = "hline-acquire", version, about = "Capture and plot a hydrogen-line PSD", long_about = None)]
struct Cli {
    /// Use a synthetic tone-in-noise source instead of hardware
    #[arg(long)]
    synthetic: bool,

    /// seify device arguments
    #[arg(long, default_value = "driver=rtlsdr")]
    device: String,

    /// Tuner center frequency, Hz
    #[arg(long, default_value_t = CENTER_FREQUENCY_HZ)]
    center_freq: f64,

    /// Sample rate, samples/s
    #[arg(long, default_value_t = SAMPLE_RATE_HZ)]
    sample_rate: f64,

    /// Number of complex samples to capture
    #[arg(long, default_value_t = N_SAMPLES)]
    samples: usize,

    /// FFT length
    #[arg(long, default_value_t = FFT_WINDOW_SIZE)]
    fft_size: usize,

    /// Signal/noise power ratio that enables noise subtraction
    #[arg(long, default_value_t = NOISE_THRESHOLD)]
    noise_threshold: f64,

    /// Also write the PSD (Hz, dB) as a two-column text file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the summary and exit without opening a window
    #[arg(long)]
    no_plot: bool,
}

impl Cli {
    fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            center_frequency_hz: self.center_freq,
            sample_rate_hz: self.sample_rate,
            n_samples: self.samples,
            fft_size: self.fft_size,
            noise_threshold: self.noise_threshold,
        }
    }

    fn open_source(&self) -> Result<Box<dyn SampleSource>> {
        if self.synthetic {
            log::info!("Using synthetic source");
            return Ok(Box::new(SyntheticSource::new(H_LINE_FREQUENCY_HZ, 0.05, 0.5, 42)));
        }
        open_hardware(&self.device)
    }
}

#[cfg(feature = "rtlsdr")]
fn open_hardware(args: &str) -> Result<Box<dyn SampleSource>> {
    let source = hline::acquisition::RtlSdrSource::open(args).context("opening SDR")?;
    Ok(Box::new(source))
}

#[cfg(not(feature = "rtlsdr"))]
fn open_hardware(_args: &str) -> Result<Box<dyn SampleSource>> {
    anyhow::bail!("built without the `rtlsdr` feature; use --synthetic or rebuild with --features rtlsdr")
}

fn summary(acq: &Acquisition) -> Vec<String> {
    let mut lines = vec![
        format!("Signal bin {} ({:.6} MHz)", acq.signal_bin, acq.spectrum.frequency_hz[acq.signal_bin] / 1e6),
        format!("Signal power {:.4e}", acq.signal_power),
        format!("Noise power {:.4e}", acq.noise_power),
        format!("SNR {:.3}", acq.snr()),
    ];
    match acq.noise_reduced_power {
        Some(p) => lines.push(format!("Noise-reduced signal {p:.4e}")),
        None => lines.push("Noise-reduced signal n/a".to_string()),
    }
    lines
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.acquisition_config();
    let mut source = cli.open_source()?;

    let acq = acquire(&mut source, &config).context("acquisition failed")?;
    let lines = summary(&acq);
    for line in &lines {
        println!("{line}");
    }

    if let Some(path) = &cli.output {
        write_spectrum(path, "Frequency/Hz Power/dB", &acq.spectrum.to_spectrum())
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {} bins to {}", acq.spectrum.len(), path.display());
    }

    if cli.no_plot {
        return Ok(());
    }

    let figure = psd_figure(
        "Hydrogen line capture",
        &acq.spectrum.frequency_mhz(),
        &acq.spectrum.power_db(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "hline – Acquisition",
        options,
        Box::new(move |_cc| Ok(Box::new(FigureApp::new(figure, lines)))),
    )
    .map_err(|e| anyhow::anyhow!("running plot window: {e}"))
}
