//! Per-frame flag motion: depth oscillation, alignment layout and the
//! restartable loop driver.

pub mod alignment;
pub mod frame_loop;
pub mod oscillation;

pub use alignment::{AlignmentMode, ALIGN_EPSILON};
pub use frame_loop::{AnimationLoopDriver, FrameTick, LoopState};
pub use oscillation::{MAX_Z, MIN_Z};
