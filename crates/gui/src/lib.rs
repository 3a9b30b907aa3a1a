// Library crate: scene lifecycle, animation and building, testable headless.
// GUI-specific modules (app, ui, GL rendering) remain in the binary crate.

pub mod animation;
pub mod build;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod scene;
pub mod session;
pub mod validation;

/// Subset of viewport types the session needs (mesh data, bounds, camera,
/// surface size). GL rendering and input handling stay in the binary crate.
pub mod viewport {
    pub mod bounds;
    pub mod camera;
    pub mod mesh;
    pub mod session;
}
