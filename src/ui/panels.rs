use eframe::egui::{self, Color32, Grid, RichText, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – peak summary
// ---------------------------------------------------------------------------

/// Render the left results panel.
pub fn side_panel(ui: &mut Ui, state: &ViewerState) {
    ui.heading("Peak");
    ui.separator();

    let Some(view) = &state.view else {
        ui.label("No spectrum loaded.");
        return;
    };

    let file_name = view
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| view.path.display().to_string());

    Grid::new("peak_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("File");
            ui.label(file_name);
            ui.end_row();

            ui.label("Points");
            ui.label(view.spectrum.len().to_string());
            ui.end_row();

            ui.label("Max SNR");
            ui.strong(format!("{:.2} dB", view.peak.snr_db));
            ui.end_row();

            ui.label("Radial velocity");
            ui.strong(format!("{:.2} km/s", view.peak.radial_velocity_km_s));
            ui.end_row();

            ui.label("Peak frequency");
            ui.label(format!("{:.6} MHz", view.peak.frequency_hz / 1e6));
            ui.end_row();

            ui.label("Search window");
            ui.label(format!("±{} km/s", state.config.velocity_window_km_s));
            ui.end_row();
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(view) = &state.view {
            ui.label(format!(
                "SNR {:.2} dB at {:.2} km/s",
                view.peak.snr_db, view.peak.radial_velocity_km_s
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spectrum")
        .add_filter("Text spectra", &["txt", "dat"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
