use glam::{Mat4, Vec3};

/// Orbit camera for the flag viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl OrbitCamera {
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;

    /// 75° camera at (0, 0.75, 2) looking at the origin
    pub fn new() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.75, 2.0), Vec3::ZERO, 75.0_f32.to_radians())
    }

    /// Camera placed at `eye`, orbiting around `target`
    pub fn looking_at(eye: Vec3, target: Vec3, fov: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(0.5);
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: offset.y.atan2(horizontal).clamp(-1.5, 1.5),
            distance,
            target,
            fov,
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 50.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, Self::NEAR, Self::FAR)
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_matches_initial_position() {
        let cam = OrbitCamera::new();
        let eye = cam.eye_position();
        assert!((eye - Vec3::new(0.0, 0.75, 2.0)).length() < 1e-5, "eye = {eye:?}");
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cam = OrbitCamera::new();
        for _ in 0..200 {
            cam.zoom(0.5);
        }
        assert_eq!(cam.distance, 0.5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut cam = OrbitCamera::new();
        cam.rotate(0.0, 1000.0);
        assert_eq!(cam.pitch, 1.5);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let mut cam = OrbitCamera::new();
        let before = cam.eye_position() - cam.target;
        cam.pan(0.3, -0.2);
        let after = cam.eye_position() - cam.target;
        assert!((before - after).length() < 1e-5);
        assert!(cam.target.length() > 0.0);
    }
}
