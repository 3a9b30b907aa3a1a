use egui::Ui;

use crate::build::MeshGroupBuilder;
use crate::session::FlagSession;

pub fn show<B: MeshGroupBuilder>(ui: &mut Ui, session: &FlagSession<B>) {
    ui.horizontal(|ui| {
        let driver = session.driver();
        if driver.is_running() {
            ui.weak(format!("Running at {:.4}", driver.velocity()));
        } else {
            ui.weak("Stopped");
        }

        ui.separator();
        ui.weak(format!("Layout: {}", session.alignment().label()));

        ui.separator();
        let [w, h] = session.viewport().output_size();
        ui.weak(format!("{w}×{h}"));

        if session.loading() {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(150, 110, 60), "Loading…");
        }

        // Right-aligned version
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.weak(format!("flagwave v{}", env!("CARGO_PKG_VERSION")));
        });
    });
}
