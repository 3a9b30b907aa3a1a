//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
mod snapshot;
pub use flagwave_gui_lib::viewport::{camera, mesh, session};

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::build::MeshGroupBuilder;
use crate::session::FlagSession;
use camera::OrbitCamera;
use gl_renderer::GlRenderer;
use snapshot::{FrameSnapshot, SnapshotRenderer};

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
    frames: SnapshotRenderer,
    /// Seconds since the panel was created, fed to the frame loop
    clock: f64,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            gl_renderer: None,
            frames: SnapshotRenderer::new(),
            clock: 0.0,
        }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        match GlRenderer::new(gl) {
            Ok(renderer) => self.gl_renderer = Some(Arc::new(Mutex::new(renderer))),
            Err(e) => tracing::error!("OpenGL renderer unavailable: {e}"),
        }
    }

    /// Release GL objects on shutdown
    pub fn destroy_gl(&mut self, gl: &glow::Context) {
        if let Some(renderer) = self.gl_renderer.take() {
            if let Ok(mut r) = renderer.lock() {
                r.destroy(gl);
            }
        }
    }

    pub fn show<B: MeshGroupBuilder>(&mut self, ui: &mut Ui, session: &mut FlagSession<B>) {
        let (rect, response) = ui.allocate_exact_size(
            ui.available_size(),
            egui::Sense::click_and_drag(),
        );

        self.handle_camera(ui, &response, session);

        // ── Surface size ─────────────────────────────
        let ppp = ui.ctx().pixels_per_point();
        session
            .viewport_mut()
            .resize_points(rect.width() * ppp, rect.height() * ppp);

        // ── Frame: render, then step ─────────────────────
        self.clock += f64::from(ui.input(|i| i.stable_dt));
        session.frame(&mut self.frames, self.clock);

        if !ui.is_rect_visible(rect) {
            return;
        }

        match (&self.gl_renderer, self.frames.latest()) {
            (Some(gl_renderer), Some(snapshot)) => {
                Self::render_gl(ui, rect, gl_renderer.clone(), snapshot.clone());
            }
            (None, _) => {
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "OpenGL is not available",
                    egui::FontId::proportional(16.0),
                    egui::Color32::DARK_GRAY,
                );
            }
            _ => {}
        }
    }

    fn handle_camera<B: MeshGroupBuilder>(
        &self,
        ui: &Ui,
        response: &egui::Response,
        session: &mut FlagSession<B>,
    ) {
        let camera = &mut session.viewport_mut().camera;
        let mut changed = false;

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            camera.rotate(-delta.x * 0.5, delta.y * 0.5);
            changed = true;
        }
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            let scale = camera.distance * 0.002;
            camera.pan(-delta.x * scale, delta.y * scale);
            changed = true;
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                camera.zoom(scroll * 0.001);
                changed = true;
            }
        }
        if response.double_clicked() {
            *camera = OrbitCamera::new();
            changed = true;
        }

        if changed {
            session.viewport_mut().update_projection();
        }
    }

    fn render_gl(
        ui: &mut Ui,
        rect: egui::Rect,
        renderer: Arc<Mutex<GlRenderer>>,
        snapshot: FrameSnapshot,
    ) {
        let callback = egui::PaintCallback {
            rect,
            callback: Arc::new(eframe::egui_glow::CallbackFn::new(
                move |info, painter| {
                    let clip = info.clip_rect_in_pixels();
                    let viewport = [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ];

                    if let Ok(mut r) = renderer.lock() {
                        r.paint(painter.gl(), &snapshot, viewport);
                    }
                },
            )),
        };

        ui.painter().add(callback);
    }
}
