use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use hline::data::loader::write_spectrum;
use hline::data::model::Spectrum;
use hline::doppler::{freq_from_radial_vel, radial_vel_from_freq};

/// Write a synthetic hydrogen-line spectrum for trying out the viewer
#[derive(Parser, Debug)]
#[command(name = "generate_sample", version, about, long_about = None)]
struct Cli {
    /// Output file
    #[arg(short, long, default_value = "sample_spectrum.txt")]
    output: PathBuf,

    /// Emission line components as velocity:width:amplitude (km/s, km/s, dB)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_value = "-35:12:6,18:8:3.5")]
    line: Vec<String>,

    /// Strong interferer far outside the search window, MHz (0 disables)
    #[arg(long, default_value_t = 1419.2)]
    interferer_mhz: f64,

    /// Noise standard deviation, dB
    #[arg(long, default_value_t = 0.15)]
    noise: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn parse_component(s: &str) -> Result<(f64, f64, f64)> {
    let parts: Vec<f64> = s
        .split(':')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("bad line component '{s}'"))?;
    match parts.as_slice() {
        [v, w, a] => Ok((*v, *w, *a)),
        _ => anyhow::bail!("line component '{s}' must be velocity:width:amplitude"),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let components: Vec<(f64, f64, f64)> = cli
        .line
        .iter()
        .map(|s| parse_component(s))
        .collect::<Result<_>>()?;

    // Line profile in velocity space mapped onto a 1419.0 → 1421.8 MHz grid
    let frequency: Vec<f64> = (0..2800).map(|i| 1_419_000_000.0 + i as f64 * 1000.0).collect();
    let mut rng = StdRng::seed_from_u64(cli.seed);
    let noise = Normal::new(0.0, cli.noise).with_context(|| format!("bad noise level {}", cli.noise))?;

    let intensity: Vec<f64> = frequency
        .iter()
        .map(|&f| {
            let velocity = radial_vel_from_freq(f);
            let line: f64 = components
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(velocity, mu, sigma, amp))
                .sum();
            let interferer = if cli.interferer_mhz > 0.0 {
                gaussian(f / 1e6, cli.interferer_mhz, 0.003, 20.0)
            } else {
                0.0
            };
            line + interferer + noise.sample(&mut rng)
        })
        .collect();

    let spectrum = Spectrum::new(frequency, intensity)?;
    write_spectrum(&cli.output, "Frequency/Hz Relative_intensity/dB", &spectrum)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    let (lo, hi) = (freq_from_radial_vel(120.0), freq_from_radial_vel(-120.0));
    println!(
        "Wrote {} points to {} (search window {:.4}–{:.4} MHz)",
        spectrum.len(),
        cli.output.display(),
        lo / 1e6,
        hi / 1e6
    );
    Ok(())
}
