//! Main application module

mod keyboard;
mod styles;

use eframe::egui;

use crate::build::ContourLibrary;
use crate::config::ViewerConfig;
use crate::session::{FlagSession, HostInputs};
use crate::ui::{controls, status_bar};
use crate::viewport::ViewportPanel;

const FONT_SIZE: f32 = 14.0;

/// UI-side state: the host inputs being edited and the picker contents
pub struct ViewerState {
    pub session: FlagSession<ContourLibrary>,
    /// Inputs as edited by the controls, applied once per update
    pub inputs: HostInputs,
    /// Ids available in the library, refreshed on directory change
    pub image_ids: Vec<String>,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        let session_config = config.session_config();
        let library = ContourLibrary::new(&config.library_dir);
        let image_ids = library.image_ids();
        let mut inputs = HostInputs::from(&session_config);
        // The viewport reports its own size
        inputs.width = None;
        inputs.height = None;

        Self {
            session: FlagSession::init(library, &session_config),
            inputs,
            image_ids,
        }
    }

    /// Point the library at `dir`, reload the image list and rebuild the
    /// current image from the new folder
    pub fn set_library_dir(&mut self, dir: std::path::PathBuf) {
        self.session.set_library_dir(dir);
        self.refresh_images();
        let still_listed = self
            .inputs
            .image_id
            .as_ref()
            .is_some_and(|id| self.image_ids.contains(id));
        if !still_listed {
            self.inputs.image_id = self.image_ids.first().cloned();
        }
    }

    pub fn refresh_images(&mut self) {
        self.image_ids = self.session.builder().image_ids();
    }

    /// Step the picker selection by `delta`, wrapping around
    pub fn cycle_image(&mut self, delta: isize) {
        if self.image_ids.is_empty() {
            return;
        }
        let len = self.image_ids.len() as isize;
        let current = self
            .inputs
            .image_id
            .as_ref()
            .and_then(|id| self.image_ids.iter().position(|i| i == id))
            .map_or(-1, |i| i as isize);
        let next = (current + delta).rem_euclid(len) as usize;
        self.inputs.image_id = Some(self.image_ids[next].clone());
    }
}

/// Main application
pub struct FlagApp {
    state: ViewerState,
    viewport: ViewportPanel,
}

impl FlagApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &ViewerConfig) -> Self {
        styles::configure_styles(&cc.egui_ctx, FONT_SIZE);

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        Self {
            state: ViewerState::new(config),
            viewport,
        }
    }
}

impl eframe::App for FlagApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The previous update showed the busy indicator; build now.
        if self.state.session.pending_image().is_some() {
            self.state.session.process_pending();
        }

        keyboard::handle_keyboard(ctx, &mut self.state);

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state.session);
            });

        // ── Left panel: controls ─────────────────────────────
        egui::SidePanel::left("controls")
            .default_width(230.0)
            .width_range(180.0..=360.0)
            .resizable(true)
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::same(8)))
            .show(ctx, |ui| {
                controls::show(ui, &mut self.state);
            });

        self.state.session.apply(&self.state.inputs);

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state.session);
            });

        if self.state.session.needs_repaint() {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, gl: Option<&glow::Context>) {
        self.state.session.teardown();
        if let Some(gl) = gl {
            self.viewport.destroy_gl(gl);
        }
    }
}
