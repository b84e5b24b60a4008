use std::ops::RangeInclusive;

use eframe::egui::{Context, Id, Ui};
use egui_plot::{
    log_grid_spacer, AxisHints, GridInput, GridMark, Legend, Line, Plot, PlotBounds, PlotPoints, VLine,
    VPlacement,
};

use crate::plot::{nonsingular, Figure, LineStyle, SecondaryAxis};

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render a recorded [`Figure`] with egui_plot.
///
/// The figure's x range and y-axis setting are applied when the figure is
/// first shown, when it changes, and after a double-click reset. In between
/// the user can pan and zoom freely.
pub fn figure_plot(ui: &mut Ui, id: &str, figure: &Figure) {
    if !figure.title.is_empty() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(&figure.title);
        });
    }

    let mut plot = Plot::new(id.to_string())
        .legend(Legend::default())
        .y_axis_label(figure.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    match figure.secondary_x {
        Some(secondary) => {
            let primary = AxisHints::new_x()
                .label(figure.x_label.clone())
                .formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
                    if on_grid(mark.value, mark.step_size) {
                        format_tick(mark.value, mark.step_size)
                    } else {
                        String::new()
                    }
                });
            let velocity = AxisHints::new_x()
                .label(secondary.label)
                .placement(VPlacement::Top)
                .formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    let value = (secondary.forward)(mark.value);
                    let step = mark.step_size * slope(secondary, mark.value).abs();
                    if on_grid(value, step) {
                        format_tick(value, step)
                    } else {
                        String::new()
                    }
                });
            plot = plot
                .custom_x_axes(vec![primary, velocity])
                .x_grid_spacer(move |input: GridInput| {
                    let mut marks = secondary_marks(&input, secondary);
                    marks.extend(log_grid_spacer(10)(input));
                    marks
                });
        }
        None => plot = plot.x_axis_label(figure.x_label.clone()),
    }

    let wanted = initial_bounds(figure);
    let key = bounds_key(id);
    let ctx = ui.ctx().clone();

    let response = plot.show(ui, |plot_ui| {
        for series in &figure.series {
            let points: PlotPoints = series.points.iter().copied().collect();
            let line = Line::new(points)
                .name(&series.name)
                .color(series.color)
                .width(series.width);
            plot_ui.line(line);
        }

        for vline in &figure.vlines {
            let style = match vline.style {
                LineStyle::Solid => egui_plot::LineStyle::Solid,
                LineStyle::Dotted => egui_plot::LineStyle::dotted_dense(),
            };
            plot_ui.vline(
                VLine::new(vline.x)
                    .name(&vline.name)
                    .color(vline.color)
                    .width(vline.width)
                    .style(style),
            );
        }

        if let Some(wanted) = wanted {
            let applied = ctx.data(|d| d.get_temp::<[f64; 4]>(key));
            if applied != Some(wanted) {
                let [x0, y0, x1, y1] = wanted;
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));
                ctx.data_mut(|d| d.insert_temp(key, wanted));
            }
        }
    });

    // egui_plot resets to the data extent on double-click; restore the
    // figure's own bounds on the next frame instead.
    if response.response.double_clicked() {
        forget_bounds(&ctx, id);
    }
}

/// Memory slot holding the bounds last applied to plot `id`.
pub fn bounds_key(id: &str) -> Id {
    Id::new(id).with("figure_bounds")
}

fn forget_bounds(ctx: &Context, id: &str) {
    ctx.data_mut(|d| d.remove::<[f64; 4]>(bounds_key(id)));
}

/// `[x_min, y_min, x_max, y_max]` to show first, widened when singular.
/// `None` when the figure has no x range or nothing to autoscale to.
pub fn initial_bounds(figure: &Figure) -> Option<[f64; 4]> {
    let (x0, x1) = figure.x_range?;
    let (y0, y1) = figure.y_bounds()?;
    let (x0, x1) = nonsingular(x0, x1);
    let (y0, y1) = nonsingular(y0, y1);
    Some([x0, y0, x1, y1])
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

// Both x axes share one set of grid marks: round values of the primary
// quantity plus round values of the secondary one mapped back. Each axis
// labels only the marks that are round in its own units.

/// d(secondary)/d(primary) around `x`.
fn slope(secondary: SecondaryAxis, x: f64) -> f64 {
    let h = x.abs().max(1.0) * 1e-6;
    ((secondary.forward)(x + h) - (secondary.forward)(x - h)) / (2.0 * h)
}

/// Grid marks at round secondary values, expressed on the primary axis.
pub fn secondary_marks(input: &GridInput, secondary: SecondaryAxis) -> Vec<GridMark> {
    let (lo, hi) = input.bounds;
    let k = slope(secondary, 0.5 * (lo + hi)).abs();
    if !k.is_finite() || k == 0.0 {
        return Vec::new();
    }

    let (a, b) = ((secondary.forward)(lo), (secondary.forward)(hi));
    let mapped = GridInput {
        bounds: (a.min(b), a.max(b)),
        base_step_size: input.base_step_size * k,
    };
    log_grid_spacer(10)(mapped)
        .into_iter()
        .map(|mark| GridMark {
            value: (secondary.inverse)(mark.value),
            step_size: mark.step_size / k,
        })
        .collect()
}

/// Whether `value` is a whole multiple of `step`.
fn on_grid(value: f64, step: f64) -> bool {
    if step <= 0.0 || !step.is_finite() {
        return false;
    }
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-6
}

/// Label with as many decimals as the step needs.
fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10()).ceil() as usize
    };
    // avoid "-0"
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    format!("{value:.decimals$}")
}
