use eframe::egui;

use crate::plot::Figure;
use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// Spectrum viewer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HlineApp {
    pub state: ViewerState,
}

impl HlineApp {
    pub fn new(state: ViewerState) -> Self {
        Self { state }
    }
}

impl eframe::App for HlineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: peak summary ----
        egui::SidePanel::left("peak_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: spectrum ----
        egui::CentralPanel::default().show(ctx, |ui| match &self.state.view {
            Some(view) => plot::figure_plot(ui, "spectrum_plot", &view.figure),
            None => {
                ui.centered_and_justified(|ui: &mut egui::Ui| {
                    ui.heading("Open a spectrum to view it  (File → Open…)");
                });
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Acquisition result window
// ---------------------------------------------------------------------------

/// Shows one PSD figure plus a few lines of capture statistics.
#[derive(Debug)]
pub struct FigureApp {
    figure: Figure,
    summary: Vec<String>,
}

impl FigureApp {
    pub fn new(figure: Figure, summary: Vec<String>) -> Self {
        Self { figure, summary }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("summary").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                for line in &self.summary {
                    ui.label(line);
                    ui.separator();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_plot(ui, "psd_plot", &self.figure);
        });
    }
}
