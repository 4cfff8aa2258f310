use glam::{Mat4, Vec3};

/// Closest the orbit controls let the eye get to the target.
const MIN_DISTANCE: f32 = 0.5;

/// Look-at camera orbiting a target point.
///
/// The view and projection matrices are derived state: `update` refreshes the
/// view, `update_projection_matrix` refreshes the projection. After
/// `set_aspect_ratio` the caller must call `update_projection_matrix`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fovy: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    view: Mat4,
    projection: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            target,
            up: Vec3::Y,
            fovy: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update();
        camera.update_projection_matrix();
        camera
    }

    /// Recompute the view matrix from position, target and up.
    pub fn update(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Recompute the projection matrix from fovy, aspect and clip planes.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fovy, self.aspect, self.near, self.far);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Swing the eye around the target. `dx` turns about the up axis, `dy`
    /// tilts toward or away from it; the tilt stops short of the poles.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let yaw = offset.x.atan2(offset.z) - dx * self.sensitivity;
        let pitch = ((offset.y / radius).asin() + dy * self.sensitivity)
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());

        self.position = self.target
            + radius * Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());
    }

    /// Scale the eye distance by `factor` (< 1 moves closer).
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.position - self.target;
        let radius = (offset.length() * factor).max(MIN_DISTANCE);
        self.position = self.target + offset.normalize_or(Vec3::Z) * radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn view_maps_target_onto_forward_axis() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let p = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-5));
    }

    #[test]
    fn projection_waits_for_explicit_update() {
        let mut cam = Camera::default();
        let before = cam.projection_matrix();
        cam.set_aspect_ratio(2.0);
        assert_eq!(cam.projection_matrix(), before);
        cam.update_projection_matrix();
        assert_eq!(
            cam.projection_matrix(),
            Mat4::perspective_rh(cam.fovy, 2.0, cam.near, cam.far)
        );
    }

    #[test]
    fn orbit_keeps_distance() {
        let mut cam = Camera::default();
        cam.orbit(120.0, -40.0);
        assert!((cam.distance() - 5.0).abs() < 1e-4);
        assert_ne!(cam.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn orbit_pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.orbit(0.0, 1.0e6);
        let offset = (cam.position - cam.target).normalize();
        assert!(offset.y < 1.0);
        assert!(offset.y > 0.99);
    }

    #[test]
    fn zoom_respects_minimum_distance() {
        let mut cam = Camera::default();
        cam.zoom(0.5);
        assert!((cam.distance() - 2.5).abs() < 1e-5);
        cam.zoom(0.0);
        assert!((cam.distance() - MIN_DISTANCE).abs() < 1e-5);
    }
}
