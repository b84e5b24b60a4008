use std::path::{Path, PathBuf};

use crate::analysis::{PeakFinder, PeakResult, VelocityWindow};
use crate::config::ViewerConfig;
use crate::data::loader::load_spectrum;
use crate::data::model::Spectrum;
use crate::error::Result;
use crate::plot::{spectrum_grid, Figure};

// ---------------------------------------------------------------------------
// Analysed spectrum
// ---------------------------------------------------------------------------

/// A loaded spectrum with its figure and peak, built all-or-nothing.
#[derive(Debug, Clone)]
pub struct AnalysisView {
    pub path: PathBuf,
    pub spectrum: Spectrum,
    pub figure: Figure,
    pub peak: PeakResult,
}

impl AnalysisView {
    /// Load `path`, draw it and locate the peak. Any failure discards the
    /// whole view.
    pub fn load(path: &Path, config: &ViewerConfig) -> Result<Self> {
        let spectrum = load_spectrum(path)?;
        Self::from_spectrum(path.to_path_buf(), spectrum, config)
    }

    pub fn from_spectrum(path: PathBuf, spectrum: Spectrum, config: &ViewerConfig) -> Result<Self> {
        let mut figure = Figure::default();
        spectrum_grid(&mut figure, &config.title, &spectrum, config.y_min, config.y_max)?;

        let peak = PeakFinder::new()
            .with_window(VelocityWindow::symmetric(config.velocity_window_km_s))
            .find_peak(&spectrum)?;

        Ok(Self {
            path,
            spectrum,
            figure,
            peak,
        })
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct ViewerState {
    pub config: ViewerConfig,

    /// Current analysis (None until a file is loaded).
    pub view: Option<AnalysisView>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Ingest a freshly built view.
    pub fn set_view(&mut self, view: AnalysisView) {
        log::info!(
            "Loaded {} points from {}: peak SNR {} dB at {} km/s",
            view.spectrum.len(),
            view.path.display(),
            view.peak.snr_db,
            view.peak.radial_velocity_km_s
        );
        self.view = Some(view);
        self.status_message = None;
    }

    /// Load a file, keeping the previous view if it fails.
    pub fn open(&mut self, path: &Path) {
        match AnalysisView::load(path, &self.config) {
            Ok(view) => self.set_view(view),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::write_spectrum;

    fn write_sample(dir: &Path) -> PathBuf {
        let frequency: Vec<f64> = (0..=2800).map(|i| 1_419_000_000.0 + i as f64 * 1000.0).collect();
        let mut intensity = vec![0.5; frequency.len()];
        intensity[1200] = 6.0; // 1420.2 MHz
        let path = dir.join("spectrum.txt");
        write_spectrum(&path, "Frequency Intensity", &Spectrum::new(frequency, intensity).unwrap()).unwrap();
        path
    }

    #[test]
    fn open_builds_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());

        let mut state = ViewerState::default();
        state.open(&path);

        let view = state.view.as_ref().unwrap();
        assert_eq!(view.peak.snr_db, 6.0);
        assert_eq!(view.peak.radial_velocity_km_s, 43.43);
        assert_eq!(view.figure.series.len(), 1);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn failed_open_keeps_previous_view() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_sample(dir.path());
        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "h\n1 2 3\n").unwrap();

        let mut state = ViewerState::default();
        state.open(&good);
        state.open(&bad);

        assert_eq!(state.view.as_ref().unwrap().path, good);
        assert!(state.status_message.as_deref().unwrap().contains("expected 2 columns"));
    }

    #[test]
    fn bad_y_bounds_produce_no_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        let config = ViewerConfig {
            y_min: 2.0,
            y_max: 1.0,
            ..Default::default()
        };
        assert!(AnalysisView::load(&path, &config).is_err());
    }
}
