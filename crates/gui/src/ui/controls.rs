use egui::Ui;

use crate::app::ViewerState;

const VELOCITY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=0.05;

pub fn show(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Flagwave");
    ui.add_space(4.0);

    // ── Library ──────────────────────────────────────
    ui.label("Library");
    ui.horizontal(|ui| {
        let dir = state.session.builder().dir().display().to_string();
        ui.weak(dir).on_hover_text("Directory of flag descriptions");
    });
    ui.horizontal(|ui| {
        if ui.button("Choose folder…").clicked() {
            if let Some(dir) = rfd::FileDialog::new()
                .set_title("Select flag library")
                .set_directory(state.session.builder().dir())
                .pick_folder()
            {
                state.set_library_dir(dir);
            }
        }
        if ui.button("Rescan").clicked() {
            state.refresh_images();
        }
    });

    ui.separator();

    // ── Image ─────────────────────────────────────────
    ui.label("Image");
    let selected = state
        .inputs
        .image_id
        .clone()
        .unwrap_or_else(|| "None".to_string());
    egui::ComboBox::from_id_salt("image_picker")
        .selected_text(selected)
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut state.inputs.image_id, None, "None");
            for id in &state.image_ids {
                ui.selectable_value(&mut state.inputs.image_id, Some(id.clone()), id);
            }
        });
    if state.image_ids.is_empty() {
        ui.weak("No flag descriptions found");
    }

    ui.separator();

    // ── Animation ─────────────────────────────────────
    ui.label("Velocity");
    ui.add(
        egui::Slider::new(&mut state.inputs.velocity, VELOCITY_RANGE)
            .step_by(0.0005)
            .fixed_decimals(4),
    );
    ui.checkbox(&mut state.inputs.align_meshes, "Align meshes")
        .on_hover_text("Stack all flags almost flat (A)");

    ui.separator();

    // ── Scene info ────────────────────────────────────
    if state.session.loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.weak("Building flags…");
        });
    } else {
        ui.label(format!("Flags: {}", state.session.scene().flag_count()));
    }

    if let Some(err) = state.session.last_error() {
        ui.add_space(4.0);
        ui.colored_label(egui::Color32::from_rgb(190, 40, 40), err);
    }
}
