use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use hline::app::HlineApp;
use hline::config::ViewerConfig;
use hline::state::{AnalysisView, ViewerState};

/// Hydrogen-line spectrum viewer
#[derive(Parser, Debug)]
#[command(name = "hline", version, about, long_about = None)]
struct Cli {
    /// Two-column spectrum file (header line, then "frequency intensity")
    data_file: Option<PathBuf>,

    /// JSON viewer config (title, data_file, y_min, y_max, velocity_window_km_s)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plot title
    #[arg(short, long)]
    title: Option<String>,

    /// Lower y-axis bound, dB (0 together with --y-max 0 autoscales)
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,

    /// Upper y-axis bound, dB
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,

    /// Half width of the peak search window, km/s
    #[arg(long)]
    window: Option<f64>,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(path) = &self.data_file {
            config.data_file = Some(path.clone());
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(y_min) = self.y_min {
            config.y_min = y_min;
        }
        if let Some(y_max) = self.y_max {
            config.y_max = y_max;
        }
        if let Some(window) = self.window {
            config.velocity_window_km_s = window;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.viewer_config()?;
    let data_file = config.data_file.clone();
    let mut state = ViewerState::new(config);

    // A file named up front must load cleanly before any window opens.
    if let Some(path) = data_file {
        let view = AnalysisView::load(&path, &state.config)
            .with_context(|| format!("analysing {}", path.display()))?;
        println!(
            "Max SNR: {:.2} dB, radial velocity: {:.2} km/s",
            view.peak.snr_db, view.peak.radial_velocity_km_s
        );
        state.set_view(view);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "hline – Hydrogen Line Spectrum",
        options,
        Box::new(move |_cc| Ok(Box::new(HlineApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
