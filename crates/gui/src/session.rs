//! One viewer session: scene, animation loop, alignment and viewport.
//!
//! Every mutation happens in one of three places: a rebuild (outside of
//! frames), a host input change, or `frame`. Nothing here blocks.

use std::path::PathBuf;

use crate::animation::alignment::{self, AlignmentMode};
use crate::animation::frame_loop::{AnimationLoopDriver, FrameTick};
use crate::animation::oscillation;
use crate::build::{ContourLibrary, MeshGroupBuilder};
use crate::error::BuildError;
use crate::scene::environment::BACKGROUND_COLOR;
use crate::scene::{FlagGroup, Scene, SceneGraph};
use crate::viewport::camera::OrbitCamera;
use crate::viewport::session::ViewportSession;

/// Per-frame depth step used when nothing else is configured
pub const DEFAULT_VELOCITY: f32 = 0.002;

/// Values a session is mounted with
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub image_id: Option<String>,
    pub velocity: f32,
    pub align_meshes: bool,
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            image_id: None,
            velocity: DEFAULT_VELOCITY,
            align_meshes: false,
            width: 800,
            height: 600,
            background: BACKGROUND_COLOR,
        }
    }
}

/// The complete set of inputs a host hands the session
#[derive(Debug, Clone, PartialEq)]
pub struct HostInputs {
    pub image_id: Option<String>,
    pub velocity: f32,
    pub align_meshes: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<&SessionConfig> for HostInputs {
    fn from(config: &SessionConfig) -> Self {
        Self {
            image_id: config.image_id.clone(),
            velocity: config.velocity,
            align_meshes: config.align_meshes,
            width: Some(config.width),
            height: Some(config.height),
        }
    }
}

/// Render pass seam
pub trait FrameRenderer {
    fn render(&mut self, scene: &Scene, viewport: &ViewportSession);
}

/// Outcome of one `frame` call
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameReport {
    /// The tick that was delivered, `None` while the loop is stopped
    pub tick: Option<FrameTick>,
    pub rendered: bool,
    /// Flags advanced by the oscillation step
    pub stepped: usize,
}

/// What `apply` changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppliedChanges {
    pub image: bool,
    pub velocity: bool,
    pub alignment: bool,
    pub resized: bool,
}

pub struct FlagSession<B> {
    builder: B,
    graph: SceneGraph,
    driver: AnimationLoopDriver,
    viewport: ViewportSession,
    alignment: AlignmentMode,
    velocity: f32,
    image_id: Option<String>,
    pending: Option<String>,
    loading: bool,
    last_error: Option<String>,
    torn_down: bool,
}

impl<B: MeshGroupBuilder> FlagSession<B> {
    /// Mount a session: environment-only scene, camera, running loop.
    ///
    /// An initial image is queued, not built; call `process_pending`.
    pub fn init(builder: B, config: &SessionConfig) -> Self {
        let velocity = oscillation::clamp_velocity(config.velocity);
        let mut driver = AnimationLoopDriver::new();
        driver.start(velocity);

        let mut session = Self {
            builder,
            graph: SceneGraph::new(config.background),
            driver,
            viewport: ViewportSession::new(OrbitCamera::new(), config.width, config.height),
            alignment: AlignmentMode::from_bool(config.align_meshes),
            velocity,
            image_id: None,
            pending: None,
            loading: false,
            last_error: None,
            torn_down: false,
        };
        if let Some(id) = &config.image_id {
            session.request_image(id);
        }
        tracing::info!(
            "Session started at {}x{}",
            config.width,
            config.height
        );
        session
    }

    // ── Host inputs ────────────────────────────────────────────

    /// Diff `inputs` against the current state and dispatch each change
    pub fn apply(&mut self, inputs: &HostInputs) -> AppliedChanges {
        let mut changes = AppliedChanges::default();

        let wanted = self.pending.as_ref().or(self.image_id.as_ref());
        if inputs.image_id.as_ref() != wanted {
            changes.image = match &inputs.image_id {
                Some(id) => self.request_image(id),
                None => {
                    self.clear_image();
                    true
                }
            };
        }
        changes.velocity = self.set_velocity(inputs.velocity);
        changes.alignment = self.set_alignment(inputs.align_meshes);
        if let (Some(w), Some(h)) = (inputs.width, inputs.height) {
            changes.resized = self.resize(w, h);
        }
        changes
    }

    /// Queue a rebuild for `image_id` and raise the loading flag.
    /// Returns false once the session is torn down.
    pub fn request_image(&mut self, image_id: &str) -> bool {
        if self.torn_down {
            return false;
        }
        self.pending = Some(image_id.to_string());
        self.loading = true;
        true
    }

    /// Queue a fresh build of the queued or current image, for when the
    /// builder's source changed under the same id.
    pub fn reload(&mut self) -> bool {
        match self.pending.clone().or_else(|| self.image_id.clone()) {
            Some(id) => self.request_image(&id),
            None => false,
        }
    }

    /// Run a queued rebuild, if any
    pub fn process_pending(&mut self) -> Option<Result<usize, BuildError>> {
        let id = self.pending.take()?;
        Some(self.rebuild(&id))
    }

    /// Replace the flag group with a fresh one for `image_id`.
    ///
    /// Failures are recorded in `last_error`; the scene keeps its
    /// environment and the loop keeps running.
    pub fn rebuild(&mut self, image_id: &str) -> Result<usize, BuildError> {
        self.loading = true;
        let result = self.graph.rebuild(&self.builder, image_id);
        self.image_id = Some(image_id.to_string());
        self.loading = false;

        match &result {
            Ok(count) => {
                tracing::info!("Built {count} flags for '{image_id}'");
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Flag build failed for '{image_id}': {e}");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    fn clear_image(&mut self) {
        self.pending = None;
        self.image_id = None;
        self.loading = false;
        self.graph.clear();
    }

    /// Change the per-frame velocity, restarting the loop so the next frame
    /// uses it. Returns true if the velocity changed.
    pub fn set_velocity(&mut self, velocity: f32) -> bool {
        let velocity = oscillation::clamp_velocity(velocity);
        if velocity == self.velocity || self.torn_down {
            return false;
        }
        self.velocity = velocity;
        self.driver.restart(velocity);
        true
    }

    /// Switch layout and reconcile every flag's depth once.
    /// Returns true if the mode changed.
    pub fn set_alignment(&mut self, aligned: bool) -> bool {
        let mode = AlignmentMode::from_bool(aligned);
        if mode == self.alignment {
            return false;
        }
        self.alignment = mode;
        if let Some(group) = self.graph.group_mut() {
            alignment::reconcile(group, mode);
        }
        true
    }

    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.viewport.resize(width, height)
    }

    // ── Frame ─────────────────────────────────────────────────

    /// Render the scene, then advance the oscillation, if the loop runs
    pub fn frame<R: FrameRenderer + ?Sized>(&mut self, renderer: &mut R, elapsed: f64) -> FrameReport {
        let Some(tick) = self.driver.tick(elapsed) else {
            return FrameReport::default();
        };

        renderer.render(self.graph.scene(), &self.viewport);
        let stepped = self
            .graph
            .group_mut()
            .map_or(0, |group| oscillation::step(group, tick.velocity));

        FrameReport {
            tick: Some(tick),
            rendered: true,
            stepped,
        }
    }

    /// Stop the loop and drop the flag group. Later inputs are ignored.
    pub fn teardown(&mut self) {
        self.driver.stop();
        self.clear_image();
        self.torn_down = true;
        tracing::info!("Session torn down");
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        self.graph.scene()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn group(&self) -> Option<&FlagGroup> {
        self.graph.group()
    }

    pub fn driver(&self) -> &AnimationLoopDriver {
        &self.driver
    }

    pub fn viewport(&self) -> &ViewportSession {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportSession {
        &mut self.viewport
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn alignment(&self) -> AlignmentMode {
        self.alignment
    }

    /// Image of the current scene (or of the last failed build)
    pub fn image_id(&self) -> Option<&str> {
        self.image_id.as_deref()
    }

    pub fn pending_image(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// The host should keep repainting while this is true
    pub fn needs_repaint(&self) -> bool {
        self.driver.is_running() || self.loading
    }
}

impl FlagSession<ContourLibrary> {
    /// Point the library at `dir` and rebuild the current image from it
    pub fn set_library_dir(&mut self, dir: impl Into<PathBuf>) -> bool {
        self.builder.set_dir(dir);
        self.reload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::stripes_builder;

    struct Counting(usize);

    impl FrameRenderer for Counting {
        fn render(&mut self, _scene: &Scene, _viewport: &ViewportSession) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_init_starts_loop_and_queues_image() {
        let config = SessionConfig {
            image_id: Some("three".into()),
            ..Default::default()
        };
        let mut s = FlagSession::init(stripes_builder(), &config);
        assert!(s.driver().is_running());
        assert!(s.loading());
        assert!(s.group().is_none());

        assert_eq!(s.process_pending().unwrap().unwrap(), 3);
        assert!(!s.loading());
        assert_eq!(s.image_id(), Some("three"));
        assert!(s.process_pending().is_none());
    }

    #[test]
    fn test_frame_renders_before_stepping() {
        let mut s = FlagSession::init(stripes_builder(), &SessionConfig::default());
        s.rebuild("three").unwrap();
        let before = s.group().unwrap().depths();

        let mut r = Counting(0);
        let report = s.frame(&mut r, 0.0);
        assert!(report.rendered);
        assert_eq!(report.stepped, 3);
        assert_eq!(r.0, 1);
        let after = s.group().unwrap().depths();
        for (b, a) in before.iter().zip(&after) {
            assert!((a - b - DEFAULT_VELOCITY).abs() < 1e-6);
        }
    }

    #[test]
    fn test_build_failure_is_recorded_and_loop_continues() {
        let mut s = FlagSession::init(stripes_builder(), &SessionConfig::default());
        assert!(s.rebuild("missing").is_err());
        assert!(s.last_error().is_some());
        assert!(!s.loading());

        let report = s.frame(&mut Counting(0), 0.0);
        assert!(report.rendered);
        assert_eq!(report.stepped, 0);

        s.rebuild("two").unwrap();
        assert!(s.last_error().is_none());
    }

    #[test]
    fn test_same_velocity_does_not_restart() {
        let mut s = FlagSession::init(stripes_builder(), &SessionConfig::default());
        assert!(!s.set_velocity(DEFAULT_VELOCITY));
        assert_eq!(s.driver().starts(), 1);
    }

    #[test]
    fn test_teardown_stops_everything() {
        let mut s = FlagSession::init(stripes_builder(), &SessionConfig::default());
        s.rebuild("three").unwrap();
        s.teardown();
        assert!(!s.driver().is_running());
        assert!(s.group().is_none());
        assert!(!s.set_velocity(0.5));
        assert!(!s.request_image("two"));
        assert!(!s.loading());

        let mut inputs = HostInputs::from(&SessionConfig::default());
        inputs.image_id = Some("two".into());
        assert!(!s.apply(&inputs).image);
        assert!(s.pending_image().is_none());
        assert!(!s.frame(&mut Counting(0), 1.0).rendered);
    }

    #[test]
    fn test_reload_requeues_current_image() {
        let mut s = FlagSession::init(stripes_builder(), &SessionConfig::default());
        assert!(!s.reload());

        s.rebuild("three").unwrap();
        assert!(s.reload());
        assert_eq!(s.pending_image(), Some("three"));
        assert_eq!(s.process_pending().unwrap().unwrap(), 3);
        assert_eq!(s.builder().calls(), 2);
    }

    #[test]
    fn test_apply_clearing_image_drops_group() {
        let mut s = FlagSession::init(stripes_builder(), &SessionConfig::default());
        s.rebuild("three").unwrap();
        let mut inputs = HostInputs::from(&SessionConfig::default());
        inputs.image_id = None;
        let changes = s.apply(&inputs);
        assert!(changes.image);
        assert!(s.group().is_none());
        assert_eq!(s.image_id(), None);
    }
}
