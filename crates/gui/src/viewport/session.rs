//! Camera and output-size bookkeeping for the display surface.

use glam::Mat4;

use super::camera::OrbitCamera;

/// Keeps the camera projection and renderer output size in sync with the
/// display surface. Never touches scene or animation state.
#[derive(Debug, Clone)]
pub struct ViewportSession {
    pub camera: OrbitCamera,
    output_size: [u32; 2],
    aspect: f32,
    projection: Mat4,
    resize_count: u64,
}

impl ViewportSession {
    pub fn new(camera: OrbitCamera, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let aspect = width as f32 / height as f32;
        Self {
            projection: camera.projection_matrix(aspect),
            camera,
            output_size: [width, height],
            aspect,
            resize_count: 0,
        }
    }

    /// Apply a reported surface size. Zero sizes are ignored.
    ///
    /// Returns true if the projection and output size were updated.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::warn!("Ignoring viewport resize to {width}x{height}");
            return false;
        }
        if self.output_size == [width, height] {
            return false;
        }

        self.output_size = [width, height];
        self.aspect = width as f32 / height as f32;
        self.update_projection();
        self.resize_count += 1;
        tracing::debug!("Viewport resized to {width}x{height} (aspect {:.3})", self.aspect);
        true
    }

    /// Resize from logical points as reported by the UI toolkit
    pub fn resize_points(&mut self, width: f32, height: f32) -> bool {
        if !width.is_finite() || !height.is_finite() || width < 1.0 || height < 1.0 {
            return false;
        }
        self.resize(width.round() as u32, height.round() as u32)
    }

    /// Recompute projection after a camera change (fov, orbit)
    pub fn update_projection(&mut self) {
        self.projection = self.camera.projection_matrix(self.aspect);
    }

    pub fn output_size(&self) -> [u32; 2] {
        self.output_size
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.camera.view_matrix()
    }

    pub fn resize_count(&self) -> u64 {
        self.resize_count
    }
}
