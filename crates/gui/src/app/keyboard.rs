//! Keyboard shortcut handling

use eframe::egui;

use super::ViewerState;

/// Multiplier applied by the velocity shortcuts
const VELOCITY_STEP: f32 = 1.5;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut ViewerState) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    ctx.input(|i| {
        // A: toggle alignment
        if i.key_pressed(egui::Key::A) && !i.modifiers.command {
            state.inputs.align_meshes = !state.inputs.align_meshes;
        }
        // + / -: faster / slower
        if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
            state.inputs.velocity = (state.inputs.velocity * VELOCITY_STEP).clamp(0.0001, 0.1);
        }
        if i.key_pressed(egui::Key::Minus) {
            state.inputs.velocity = (state.inputs.velocity / VELOCITY_STEP).clamp(0.0001, 0.1);
        }
        // Up / Down: previous / next image
        if i.key_pressed(egui::Key::ArrowUp) {
            state.cycle_image(-1);
        }
        if i.key_pressed(egui::Key::ArrowDown) {
            state.cycle_image(1);
        }
        // F5: rescan the library directory
        if i.key_pressed(egui::Key::F5) {
            state.refresh_images();
        }
    });
}
