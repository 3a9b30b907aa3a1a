//! Headless test harness for driving a flag session frame by frame.

use crate::build::MeshGroupBuilder;
use crate::error::BuildError;
use crate::fixtures::{stripes_builder, FixtureBuilder};
use crate::scene::{Direction, Scene};
use crate::session::{FlagSession, FrameRenderer, FrameReport, HostInputs, SessionConfig};
use crate::validation::MeshValidator;
use crate::viewport::session::ViewportSession;

const FRAME_SECONDS: f64 = 1.0 / 60.0;

/// What the render pass saw on one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFrame {
    pub depths: Vec<f32>,
    pub child_count: usize,
    pub output_size: [u32; 2],
}

/// Renderer that records the scene instead of drawing it
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RenderedFrame>,
}

impl FrameRenderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, viewport: &ViewportSession) {
        self.frames.push(RenderedFrame {
            depths: scene
                .flag_group
                .as_ref()
                .map(|g| g.depths())
                .unwrap_or_default(),
            child_count: scene.child_count(),
            output_size: viewport.output_size(),
        });
    }
}

/// Headless harness: a session, a recording renderer and a fake clock
pub struct TestHarness<B: MeshGroupBuilder = FixtureBuilder> {
    pub session: FlagSession<B>,
    pub renderer: RecordingRenderer,
    clock: f64,
}

impl TestHarness<FixtureBuilder> {
    /// Session over `stripes_builder` with default config and no image
    pub fn new() -> Self {
        Self::with_builder(stripes_builder(), &SessionConfig::default())
    }
}

impl<B: MeshGroupBuilder> TestHarness<B> {
    pub fn with_builder(builder: B, config: &SessionConfig) -> Self {
        Self {
            session: FlagSession::init(builder, config),
            renderer: RecordingRenderer::default(),
            clock: 0.0,
        }
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Request `image_id` and run the rebuild immediately
    pub fn load(&mut self, image_id: &str) -> Result<usize, BuildError> {
        self.session.request_image(image_id);
        match self.session.process_pending() {
            Some(result) => result,
            None => Ok(0),
        }
    }

    pub fn set_velocity(&mut self, velocity: f32) -> bool {
        self.session.set_velocity(velocity)
    }

    pub fn set_aligned(&mut self, aligned: bool) -> bool {
        self.session.set_alignment(aligned)
    }

    pub fn apply(&mut self, inputs: &HostInputs) {
        self.session.apply(inputs);
        self.session.process_pending();
    }

    // ── Frames ────────────────────────────────────────────────

    /// Deliver one frame at the next clock step
    pub fn frame(&mut self) -> FrameReport {
        self.clock += FRAME_SECONDS;
        self.session.frame(&mut self.renderer, self.clock)
    }

    pub fn run_frames(&mut self, n: usize) -> Vec<FrameReport> {
        (0..n).map(|_| self.frame()).collect()
    }

    // ── Inspection ────────────────────────────────────────────

    /// Current depth of every flag (empty without a group)
    pub fn depths(&self) -> Vec<f32> {
        self.session.group().map(|g| g.depths()).unwrap_or_default()
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.session.group().map(|g| g.directions()).unwrap_or_default()
    }

    pub fn original_depths(&self) -> Vec<f32> {
        self.session
            .group()
            .map(|g| g.original_depths())
            .unwrap_or_default()
    }

    pub fn flag_count(&self) -> usize {
        self.session.scene().flag_count()
    }

    pub fn frames_rendered(&self) -> usize {
        self.renderer.frames.len()
    }

    pub fn last_rendered(&self) -> Option<&RenderedFrame> {
        self.renderer.frames.last()
    }

    /// Validation errors per flag name; empty when every mesh is sound
    pub fn mesh_errors(&self) -> Vec<(String, Vec<String>)> {
        self.session
            .group()
            .map(|g| {
                g.flags()
                    .iter()
                    .map(|f| (f.name.clone(), MeshValidator::new(&f.mesh).validate_all()))
                    .filter(|(_, errors)| !errors.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for TestHarness<FixtureBuilder> {
    fn default() -> Self {
        Self::new()
    }
}
