//! Damped orbit controls: drag rotates the camera around a target, the wheel dollies.
//!
//! The camera position is kept in spherical coordinates around the target
//! (`phi` measured from +Y, `theta` around Y starting at +Z). Input only
//! accumulates deltas; `update` applies a damped share of them each step and
//! clamps the result to the configured polar and distance limits.

use glam::{Vec2, Vec3};

use crate::api::config::ControlsConfig;
use crate::renderer::camera::PerspectiveCamera;

/// Keeps `phi` away from the poles so `look_at` stays well defined.
const POLE_EPS: f32 = 1e-6;
/// Remaining rotation below this is dropped.
const SETTLE_EPS: f32 = 1e-7;

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    config: ControlsConfig,
}

impl OrbitControls {
    /// Start from the camera's current position relative to the origin.
    pub fn new(config: ControlsConfig, camera: &PerspectiveCamera) -> Self {
        let target = camera.target;
        let offset = camera.position - target;
        let radius = offset.length().max(f32::EPSILON);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let mut controls = Self {
            target,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            config,
        };
        controls.clamp();
        controls
    }

    /// Queue a rotation from a pointer drag of `delta` CSS pixels on a surface `surface_height` tall.
    pub fn rotate(&mut self, delta: Vec2, surface_height: f32) {
        let h = surface_height.max(1.0);
        let k = std::f32::consts::TAU * self.config.rotate_speed / h;
        self.delta_theta -= delta.x * k;
        self.delta_phi -= delta.y * k;
    }

    /// Queue a dolly. Positive wheel delta moves away from the target.
    pub fn dolly(&mut self, wheel_delta: f32) {
        let step = self.config.zoom_step.clamp(0.01, 0.999);
        if wheel_delta > 0.0 {
            self.scale /= step;
        } else if wheel_delta < 0.0 {
            self.scale *= step;
        }
    }

    /// Panning is a no-op unless enabled in the config.
    pub fn pan(&mut self, delta: Vec3) {
        if self.config.enable_pan {
            self.target += delta;
        }
    }

    /// Apply pending deltas and write the camera position. Call once per step.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        if self.config.enable_damping {
            let f = self.config.damping_factor;
            self.theta += self.delta_theta * f;
            self.phi += self.delta_phi * f;
            self.delta_theta *= 1.0 - f;
            self.delta_phi *= 1.0 - f;
            if self.delta_theta.abs() < SETTLE_EPS {
                self.delta_theta = 0.0;
            }
            if self.delta_phi.abs() < SETTLE_EPS {
                self.delta_phi = 0.0;
            }
        } else {
            self.theta += self.delta_theta;
            self.phi += self.delta_phi;
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.radius *= self.scale;
        self.scale = 1.0;
        self.clamp();

        camera.target = self.target;
        camera.position = self.target + self.offset();
    }

    fn clamp(&mut self) {
        let lo = self.config.min_polar_angle.max(POLE_EPS);
        let hi = self.config.max_polar_angle.min(std::f32::consts::PI - POLE_EPS);
        self.phi = self.phi.clamp(lo, hi.max(lo));
        let min_d = self.config.min_distance;
        let max_d = self.config.max_distance.max(min_d);
        self.radius = self.radius.clamp(min_d, max_d);
    }

    fn offset(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    /// Whether a damped rotation is still settling.
    pub fn is_moving(&self) -> bool {
        self.delta_theta != 0.0 || self.delta_phi != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CameraConfig;

    fn setup() -> (OrbitControls, PerspectiveCamera) {
        let mut camera = PerspectiveCamera::from_config(&CameraConfig::default(), 1.5);
        let mut controls = OrbitControls::new(ControlsConfig::default(), &camera);
        controls.update(&mut camera);
        (controls, camera)
    }

    #[test]
    fn starts_from_camera_position() {
        let (controls, camera) = setup();
        let expected = Vec3::new(0.0, 120.0, 400.0);
        assert!(
            (camera.position - expected).length() < 1e-2,
            "camera drifted to {:?}",
            camera.position
        );
        assert!((controls.distance() - expected.length()).abs() < 1e-2);
    }

    #[test]
    fn damping_spreads_rotation_over_steps() {
        let (mut controls, mut camera) = setup();
        let start = controls.azimuth();
        controls.rotate(Vec2::new(100.0, 0.0), 720.0);
        controls.update(&mut camera);
        let first = (controls.azimuth() - start).abs();
        for _ in 0..200 {
            controls.update(&mut camera);
        }
        let total = (controls.azimuth() - start).abs();
        assert!(first > 0.0 && first < total, "first={first} total={total}");
        let full = std::f32::consts::TAU * 100.0 / 720.0;
        assert!((total - full).abs() < 0.01, "total={total} expected≈{full}");
    }

    #[test]
    fn distance_and_polar_stay_clamped() {
        let (mut controls, mut camera) = setup();
        for _ in 0..200 {
            controls.dolly(1.0);
            controls.rotate(Vec2::new(0.0, 5000.0), 720.0);
            controls.update(&mut camera);
            assert!(controls.distance() <= 1200.0 + 1e-3);
            assert!(controls.polar_angle() >= 0.0);
            assert!(controls.polar_angle() <= std::f32::consts::PI);
        }
        for _ in 0..400 {
            controls.dolly(-1.0);
            controls.update(&mut camera);
            assert!(controls.distance() >= 100.0 - 1e-3);
        }
        assert!((controls.distance() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn pan_disabled_by_default() {
        let (mut controls, mut camera) = setup();
        controls.pan(Vec3::new(50.0, 0.0, 0.0));
        controls.update(&mut camera);
        assert_eq!(camera.target, Vec3::ZERO);
    }
}
