//! Restartable per-frame scheduler.
//!
//! The driver captures the velocity when it starts; frames only ever see that
//! value. Changing velocity therefore means `restart`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// One delivered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frames delivered since the last start, starting at 1
    pub frame: u64,
    /// Velocity captured at start
    pub velocity: f32,
    /// Host clock in seconds, monotonically increasing
    pub elapsed: f64,
    /// Seconds since the previous tick of this run (0 for the first)
    pub delta: f64,
}

#[derive(Debug, Clone, Default)]
pub struct AnimationLoopDriver {
    state: LoopState,
    velocity: f32,
    frame: u64,
    last_elapsed: Option<f64>,
    starts: u64,
    stops: u64,
    frames_delivered: u64,
}

impl AnimationLoopDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin delivering frames at `velocity`. Starting a running driver
    /// restarts it.
    pub fn start(&mut self, velocity: f32) {
        if self.is_running() {
            self.stop();
        }
        self.state = LoopState::Running;
        self.velocity = velocity;
        self.frame = 0;
        self.last_elapsed = None;
        self.starts += 1;
        tracing::info!("Animation loop started (velocity {velocity})");
    }

    /// Cancel frame delivery. Stopping a stopped driver does nothing.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = LoopState::Stopped;
        self.stops += 1;
        tracing::debug!("Animation loop stopped after {} frames", self.frame);
    }

    pub fn restart(&mut self, velocity: f32) {
        self.stop();
        self.start(velocity);
    }

    /// Deliver a frame at host time `elapsed`, or `None` while stopped
    pub fn tick(&mut self, elapsed: f64) -> Option<FrameTick> {
        if !self.is_running() {
            return None;
        }
        let delta = self
            .last_elapsed
            .map_or(0.0, |last| (elapsed - last).max(0.0));
        self.last_elapsed = Some(elapsed);
        self.frame += 1;
        self.frames_delivered += 1;
        Some(FrameTick {
            frame: self.frame,
            velocity: self.velocity,
            elapsed,
            delta,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Velocity captured at the most recent start
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn starts(&self) -> u64 {
        self.starts
    }

    pub fn stops(&self) -> u64 {
        self.stops
    }

    /// Frames delivered over the driver's lifetime
    pub fn frames_delivered(&self) -> u64 {
        self.frames_delivered
    }
}
