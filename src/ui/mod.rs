//! egui rendering: panels for the viewer and the shared figure plot.

pub mod panels;
pub mod plot;
