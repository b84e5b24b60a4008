use eframe::egui::Color32;

use crate::data::model::Spectrum;
use crate::doppler::{freq_from_radial_vel, radial_vel_from_freq, H_LINE_FREQUENCY_HZ};
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Figure primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
}

/// A named poly-line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
    pub width: f32,
}

/// A vertical reference line spanning the plot.
#[derive(Debug, Clone, PartialEq)]
pub struct VLine {
    pub name: String,
    pub x: f64,
    pub color: Color32,
    pub width: f32,
    pub style: LineStyle,
}

/// Y-axis scaling.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum YAxis {
    #[default]
    Auto,
    Fixed { min: f64, max: f64 },
}

impl YAxis {
    /// `0.0, 0.0` selects autoscale. Any other pair is taken literally,
    /// including an equal non-zero pair.
    pub fn from_bounds(min: f64, max: f64) -> Result<Self, ConfigError> {
        if min == 0.0 && max == 0.0 {
            return Ok(YAxis::Auto);
        }
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ConfigError::YBounds { min, max });
        }
        Ok(YAxis::Fixed { min, max })
    }
}

/// A second x axis drawn along the top, derived pointwise from the primary.
#[derive(Debug, Clone, Copy)]
pub struct SecondaryAxis {
    pub label: &'static str,
    /// primary → secondary
    pub forward: fn(f64) -> f64,
    /// secondary → primary
    pub inverse: fn(f64) -> f64,
}

// ---------------------------------------------------------------------------
// Plotter – the drawing surface seen by the figure builders
// ---------------------------------------------------------------------------

/// Narrow plotting surface. Builders draw into it; backends render it.
pub trait Plotter {
    fn line(&mut self, series: Series);
    fn vline(&mut self, line: VLine);
    fn set_labels(&mut self, title: &str, x_label: &str, y_label: &str);
    fn set_x_range(&mut self, min: f64, max: f64);
    fn set_y_axis(&mut self, axis: YAxis);
    fn secondary_x_axis(&mut self, axis: SecondaryAxis);
}

/// Recorded figure, rendered by [`crate::ui::plot::figure_plot`].
#[derive(Debug, Clone, Default)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub vlines: Vec<VLine>,
    pub x_range: Option<(f64, f64)>,
    pub y_axis: YAxis,
    pub secondary_x: Option<SecondaryAxis>,
}

impl Plotter for Figure {
    fn line(&mut self, series: Series) {
        self.series.push(series);
    }

    fn vline(&mut self, line: VLine) {
        self.vlines.push(line);
    }

    fn set_labels(&mut self, title: &str, x_label: &str, y_label: &str) {
        self.title = title.to_string();
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
    }

    fn set_x_range(&mut self, min: f64, max: f64) {
        self.x_range = Some((min, max));
    }

    fn set_y_axis(&mut self, axis: YAxis) {
        self.y_axis = axis;
    }

    fn secondary_x_axis(&mut self, axis: SecondaryAxis) {
        self.secondary_x = Some(axis);
    }
}

impl Figure {
    /// Y range to display: the fixed bounds, or the data range plus a 5 %
    /// margin when autoscaling. `None` when there is nothing to scale to.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        match self.y_axis {
            YAxis::Fixed { min, max } => Some((min, max)),
            YAxis::Auto => {
                let (lo, hi) = self
                    .series
                    .iter()
                    .flat_map(|s| s.points.iter().map(|p| p[1]))
                    .filter(|y| y.is_finite())
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
                        (lo.min(y), hi.max(y))
                    });
                if lo > hi {
                    return None;
                }
                let span = hi - lo;
                let pad = if span > 0.0 {
                    span * 0.05
                } else {
                    lo.abs().max(1.0) * 0.05
                };
                Some((lo - pad, hi + pad))
            }
        }
    }
}

/// Widen a zero-height range so it can be drawn, the way matplotlib treats
/// singular limits: ±5 % of the value, or ±0.05 around zero.
pub fn nonsingular(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        return (min, max);
    }
    if min == 0.0 {
        (-0.05, 0.05)
    } else {
        let pad = min.abs() * 0.05;
        (min - pad, max + pad)
    }
}

// ---------------------------------------------------------------------------
// Figure builders
// ---------------------------------------------------------------------------

pub const OBSERVED_COLOR: Color32 = Color32::from_rgb(0, 128, 0);
pub const REFERENCE_COLOR: Color32 = Color32::from_rgb(220, 30, 30);
pub const PSD_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

/// Draw an observed hydrogen-line spectrum with the rest frequency marked
/// and a radial-velocity axis on top.
///
/// `y_min == y_max == 0.0` autoscales the Y axis; otherwise the axis is
/// fixed to `[y_min, y_max]`. Bounds are checked before anything is drawn.
pub fn spectrum_grid<P: Plotter>(
    plotter: &mut P,
    title: &str,
    spectrum: &Spectrum,
    y_min: f64,
    y_max: f64,
) -> Result<(), ConfigError> {
    let y_axis = YAxis::from_bounds(y_min, y_max)?;

    plotter.line(Series {
        name: "Observed data".into(),
        points: spectrum.points(),
        color: OBSERVED_COLOR,
        width: 1.5,
    });

    plotter.vline(VLine {
        name: "Theoretical frequency".into(),
        x: H_LINE_FREQUENCY_HZ,
        color: REFERENCE_COLOR,
        width: 2.0,
        style: LineStyle::Dotted,
    });

    plotter.set_labels(title, "Frequency / MHz", "Signal to noise ratio (SNR) / dB");
    if let Some((start, stop)) = spectrum.frequency_span() {
        plotter.set_x_range(start, stop);
    }
    plotter.set_y_axis(y_axis);

    plotter.secondary_x_axis(SecondaryAxis {
        label: "Radial velocity / km/s",
        forward: radial_vel_from_freq,
        inverse: freq_from_radial_vel,
    });
    Ok(())
}

/// Power spectral density of one capture, in dB against MHz.
pub fn psd_figure(title: &str, frequency_mhz: &[f64], power_db: &[f64]) -> Figure {
    let mut figure = Figure::default();
    figure.line(Series {
        name: "PSD".into(),
        points: frequency_mhz
            .iter()
            .zip(power_db)
            .map(|(&f, &p)| [f, p])
            .collect(),
        color: PSD_COLOR,
        width: 1.0,
    });
    figure.set_labels(title, "Frequency (MHz)", "Power (dB)");
    if let (Some(&first), Some(&last)) = (frequency_mhz.first(), frequency_mhz.last()) {
        figure.set_x_range(first, last);
    }
    figure.set_y_axis(YAxis::Auto);
    figure
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Spectrum {
        Spectrum::new(
            vec![1_420_000_000.0, 1_420_400_000.0, 1_420_800_000.0],
            vec![1.0, 4.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn zero_bounds_autoscale() {
        let mut fig = Figure::default();
        spectrum_grid(&mut fig, "t", &sample(), 0.0, 0.0).unwrap();
        assert_eq!(fig.y_axis, YAxis::Auto);
        let (lo, hi) = fig.y_bounds().unwrap();
        assert!((lo - 0.85).abs() < 1e-12);
        assert!((hi - 4.15).abs() < 1e-12);
    }

    #[test]
    fn equal_nonzero_bounds_are_fixed() {
        let mut fig = Figure::default();
        spectrum_grid(&mut fig, "t", &sample(), 3.0, 3.0).unwrap();
        assert_eq!(fig.y_axis, YAxis::Fixed { min: 3.0, max: 3.0 });
        assert_eq!(fig.y_bounds(), Some((3.0, 3.0)));
    }

    #[test]
    fn zero_min_with_nonzero_max_is_fixed() {
        let mut fig = Figure::default();
        spectrum_grid(&mut fig, "t", &sample(), 0.0, 0.0001).unwrap();
        assert_eq!(fig.y_axis, YAxis::Fixed { min: 0.0, max: 0.0001 });
    }

    #[test]
    fn malformed_bounds_draw_nothing() {
        let mut fig = Figure::default();
        let err = spectrum_grid(&mut fig, "t", &sample(), 5.0, 1.0).unwrap_err();
        assert_eq!(err, ConfigError::YBounds { min: 5.0, max: 1.0 });
        assert!(fig.series.is_empty());
        assert!(fig.vlines.is_empty());

        assert!(YAxis::from_bounds(f64::NAN, 1.0).is_err());
        assert!(YAxis::from_bounds(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn spectrum_grid_layout() {
        let mut fig = Figure::default();
        spectrum_grid(&mut fig, "Mounted Parabolic Build", &sample(), 0.0, 0.0).unwrap();

        assert_eq!(fig.title, "Mounted Parabolic Build");
        assert_eq!(fig.x_label, "Frequency / MHz");
        assert_eq!(fig.y_label, "Signal to noise ratio (SNR) / dB");
        assert_eq!(fig.series.len(), 1);
        assert_eq!(fig.series[0].name, "Observed data");
        assert_eq!(fig.series[0].points.len(), 3);
        assert_eq!(fig.vlines.len(), 1);
        assert_eq!(fig.vlines[0].x, H_LINE_FREQUENCY_HZ);
        assert_eq!(fig.vlines[0].style, LineStyle::Dotted);
        assert_eq!(fig.x_range, Some((1_420_000_000.0, 1_420_800_000.0)));
    }

    #[test]
    fn secondary_axis_is_radial_velocity() {
        let mut fig = Figure::default();
        spectrum_grid(&mut fig, "t", &sample(), 0.0, 0.0).unwrap();
        let axis = fig.secondary_x.unwrap();
        assert_eq!((axis.forward)(H_LINE_FREQUENCY_HZ), 0.0);
        let f = 1_420_200_000.0;
        assert!(((axis.inverse)((axis.forward)(f)) - f).abs() < 1e-3);
    }

    #[test]
    fn empty_spectrum_has_no_x_range() {
        let mut fig = Figure::default();
        spectrum_grid(&mut fig, "t", &Spectrum::default(), 0.0, 0.0).unwrap();
        assert_eq!(fig.x_range, None);
        assert_eq!(fig.y_bounds(), None);
    }

    #[test]
    fn nonsingular_widens_equal_bounds() {
        assert_eq!(nonsingular(1.0, 2.0), (1.0, 2.0));
        assert_eq!(nonsingular(0.0, 0.0), (-0.05, 0.05));
        let (lo, hi) = nonsingular(-4.0, -4.0);
        assert!((lo + 4.2).abs() < 1e-12);
        assert!((hi + 3.8).abs() < 1e-12);
    }

    #[test]
    fn psd_figure_labels() {
        let fig = psd_figure("Capture", &[1419.2, 1420.4, 1421.6], &[-10.0, 5.0, -12.0]);
        assert_eq!(fig.x_label, "Frequency (MHz)");
        assert_eq!(fig.y_label, "Power (dB)");
        assert_eq!(fig.x_range, Some((1419.2, 1421.6)));
        assert!(fig.secondary_x.is_none());
        assert_eq!(fig.series[0].points[1], [1420.4, 5.0]);
    }
}
