use glam::{Mat4, Vec3};
use std::f32::consts::PI;

use crate::animation::easing::{ease_in_out_cubic, lerp, lerp_angle_rad};

/// Keeps phi strictly inside (0, PI) so the orbit never reaches the poles.
pub const PHI_MARGIN: f32 = 0.05;
/// Up vectors shorter than this are considered degenerate and reset to +Y.
pub const MIN_UP_LENGTH: f32 = 1e-3;
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;

const DEFAULT_RADIUS: f32 = 6.0;

/// Full camera snapshot holding both the Cartesian and spherical
/// representations, used by keyframes and state restore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: Vec3,
    pub at: Vec3,
    pub up: Vec3,
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
    pub scale: f32,
}

impl CameraState {
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.eye.abs_diff_eq(other.eye, epsilon)
            && self.at.abs_diff_eq(other.at, epsilon)
            && self.up.abs_diff_eq(other.up, epsilon)
            && (self.theta - other.theta).abs() <= epsilon
            && (self.phi - other.phi).abs() <= epsilon
            && (self.radius - other.radius).abs() <= epsilon
            && (self.scale - other.scale).abs() <= epsilon
    }
}

/// Orbit camera with synchronized Cartesian (eye/at/up) and spherical
/// (theta/phi/radius) representations. Mutating either side recomputes the
/// other, so `eye == at + radius * spherical_dir(theta, phi)` always holds.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    at: Vec3,
    up: Vec3,
    theta: f32,
    phi: f32,
    radius: f32,
    base_radius: f32,
    scale: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            eye: Vec3::ZERO,
            at: Vec3::new(0.0, 1.0, 0.0),
            up: Vec3::Y,
            theta: PI / 2.0,
            phi: PI / 2.5,
            radius: DEFAULT_RADIUS,
            base_radius: DEFAULT_RADIUS,
            scale: 1.0,
            fov: 45.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        };
        camera.sync_eye_from_spherical();
        camera
    }
}

fn spherical_dir(theta: f32, phi: f32) -> Vec3 {
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn at(&self) -> Vec3 {
        self.at
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
        self.sync_spherical_from_eye();
    }

    pub fn set_at(&mut self, at: Vec3) {
        self.at = at;
        self.sync_spherical_from_eye();
    }

    /// Renormalizes the up vector. Near-zero inputs fall back to +Y instead of
    /// propagating NaN into the view matrix.
    pub fn set_up(&mut self, up: Vec3) {
        if up.length() < MIN_UP_LENGTH {
            self.up = Vec3::Y;
        } else {
            self.up = up.normalize();
        }
    }

    /// Drag-to-orbit: offsets theta/phi and recomputes the eye position.
    pub fn orbit(&mut self, delta_theta: f32, delta_phi: f32) {
        self.theta += delta_theta;
        self.phi = (self.phi + delta_phi).clamp(PHI_MARGIN, PI - PHI_MARGIN);
        self.sync_eye_from_spherical();
    }

    /// Zoom factor, inversely linked to the orbit radius.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.radius = self.base_radius / self.scale;
        self.sync_eye_from_spherical();
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Pure function of the current eye/at/up; safe to call every frame.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.at, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            eye: self.eye,
            at: self.at,
            up: self.up,
            theta: self.theta,
            phi: self.phi,
            radius: self.radius,
            scale: self.scale,
        }
    }

    pub fn set_state(&mut self, state: &CameraState) {
        self.eye = state.eye;
        self.at = state.at;
        self.theta = state.theta;
        self.phi = state.phi.clamp(PHI_MARGIN, PI - PHI_MARGIN);
        self.radius = state.radius;
        self.scale = state.scale.clamp(MIN_SCALE, MAX_SCALE);
        self.base_radius = self.radius * self.scale;
        self.set_up(state.up);
    }

    /// Eased blend between two camera states. Positions lerp componentwise;
    /// theta takes the shortest arc so an orbit crossing the angular seam does
    /// not reverse direction.
    pub fn interpolate_state(a: &CameraState, b: &CameraState, t: f32) -> CameraState {
        let t = ease_in_out_cubic(t);
        let up = a.up.lerp(b.up, t);
        let up = if up.length() < MIN_UP_LENGTH {
            Vec3::Y
        } else {
            up.normalize()
        };
        CameraState {
            eye: a.eye.lerp(b.eye, t),
            at: a.at.lerp(b.at, t),
            up,
            theta: lerp_angle_rad(a.theta, b.theta, t),
            phi: lerp(a.phi, b.phi, t),
            radius: lerp(a.radius, b.radius, t),
            scale: lerp(a.scale, b.scale, t),
        }
    }

    fn sync_spherical_from_eye(&mut self) {
        let offset = self.eye - self.at;
        let len = offset.length();
        if len < 1e-5 {
            // Degenerate eye==at: keep the previous orbit and rebuild the eye.
            self.sync_eye_from_spherical();
            return;
        }
        self.radius = len;
        self.phi = (offset.y / len)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(PHI_MARGIN, PI - PHI_MARGIN);
        self.theta = offset.z.atan2(offset.x);
        self.base_radius = self.radius * self.scale;
    }

    fn sync_eye_from_spherical(&mut self) {
        self.eye = self.at + self.radius * spherical_dir(self.theta, self.phi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, eps: f32) {
        assert!((a - b).abs() < eps, "{a} !~ {b}");
    }

    #[test]
    fn eye_matches_spherical_invariant() {
        let mut camera = Camera::default();
        camera.orbit(0.7, -0.3);
        let expected = camera.at() + camera.radius() * spherical_dir(camera.theta(), camera.phi());
        assert!(camera.eye().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn set_eye_recomputes_spherical() {
        let mut camera = Camera::default();
        camera.set_eye(Vec3::new(3.0, 1.0, 0.0));
        assert_close(camera.radius(), 3.0, 1e-5);
        assert_close(camera.theta(), 0.0, 1e-5);
        assert_close(camera.phi(), PI / 2.0, 1e-5);
    }

    #[test]
    fn degenerate_up_resets_to_y() {
        let mut camera = Camera::default();
        camera.set_up(Vec3::new(0.0, 0.0004, 0.0));
        assert_eq!(camera.up(), Vec3::Y);

        camera.set_up(Vec3::new(0.0, 3.0, 4.0));
        assert_close(camera.up().length(), 1.0, 1e-6);
    }

    #[test]
    fn phi_clamps_away_from_poles() {
        let mut camera = Camera::default();
        camera.orbit(0.0, -10.0);
        assert!(camera.phi() >= PHI_MARGIN);
        camera.orbit(0.0, 20.0);
        assert!(camera.phi() <= PI - PHI_MARGIN);
    }

    #[test]
    fn scale_clamps_and_drives_radius() {
        let mut camera = Camera::default();
        let base = camera.radius();
        camera.set_scale(2.0);
        assert_close(camera.radius(), base / 2.0, 1e-5);
        camera.set_scale(100.0);
        assert_close(camera.scale(), MAX_SCALE, 1e-6);
        camera.set_scale(0.0);
        assert_close(camera.scale(), MIN_SCALE, 1e-6);
    }

    #[test]
    fn state_round_trip() {
        let mut camera = Camera::default();
        camera.orbit(1.1, 0.2);
        camera.set_scale(1.7);
        let state = camera.state();

        let mut other = Camera::default();
        other.set_state(&state);
        assert!(other.state().approx_eq(&state, 1e-6));
    }

    #[test]
    fn theta_interpolates_across_the_seam() {
        let a = CameraState {
            theta: 3.0,
            ..Camera::default().state()
        };
        let b = CameraState {
            theta: -3.0,
            ..Camera::default().state()
        };
        let mid = Camera::interpolate_state(&a, &b, 0.5);
        // Shortest path from 3 to -3 passes through PI.
        assert!(mid.theta.abs() > 3.0, "got {}", mid.theta);
    }

    #[test]
    fn interpolation_midpoint_is_arithmetic_mean() {
        let mut a = Camera::default().state();
        let mut b = Camera::default().state();
        a.radius = 4.0;
        b.radius = 8.0;
        let mid = Camera::interpolate_state(&a, &b, 0.5);
        assert_close(mid.radius, 6.0, 1e-5);
    }
}
