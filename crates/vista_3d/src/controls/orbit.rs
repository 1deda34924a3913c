//! Orbit camera controller
//!
//! Orbits around a target point: left drag rotates, right (or middle)
//! drag pans, the wheel zooms.

use super::CameraInput;
use crate::ecs::Component;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

#[derive(Clone, Debug, PartialEq)]
struct OrbitState {
    target: Vec3,
    distance: f32,
    azimuth: f32,
    elevation: f32,
}

/// Orbit camera controller
///
/// Spherical coordinates around `target`: azimuth about +Y (0 = camera on
/// +Z), elevation above the XZ plane. Input moves goal values; `update`
/// eases the current values toward them.
#[derive(Clone, Debug)]
pub struct OrbitController {
    /// Point the camera orbits and looks at
    pub target: Vec3,
    /// Distance from target
    pub distance: f32,
    /// Horizontal angle (radians)
    pub azimuth: f32,
    /// Vertical angle (radians, positive = above the target)
    pub elevation: f32,

    pub min_distance: f32,
    pub max_distance: f32,
    pub min_elevation: f32,
    pub max_elevation: f32,

    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Fraction of the distance per scroll line
    pub zoom_speed: f32,
    /// Fraction of the distance per pixel of drag
    pub pan_speed: f32,

    /// Smooth damping factor (0 = instant, 1 = no movement)
    pub damping: f32,

    pub enabled: bool,

    goal: OrbitState,
    saved: OrbitState,
}

impl Component for OrbitController {}

impl Default for OrbitController {
    fn default() -> Self {
        Self::from_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

impl OrbitController {
    /// Derive the spherical state from a camera position and target
    pub fn from_camera(position: Vec3, target: Vec3) -> Self {
        let state = spherical(position, target);
        Self {
            target,
            distance: state.distance,
            azimuth: state.azimuth,
            elevation: state.elevation,

            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_elevation: -FRAC_PI_2 + 0.01,
            max_elevation: FRAC_PI_2 - 0.01,

            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.001,

            damping: 0.1,
            enabled: true,

            goal: state.clone(),
            saved: state,
        }
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }

    /// Current camera position
    pub fn position(&self) -> Vec3 {
        position_of(&self.current())
    }

    /// Move the target, keeping the camera where it is
    pub fn set_target(&mut self, target: Vec3) {
        let state = spherical(self.position(), target);
        self.apply(&state);
        self.goal = state;
    }

    /// Record the current state as what [`reset`](Self::reset) returns to
    pub fn save_state(&mut self) {
        self.saved = self.current();
    }

    /// Return to the saved state
    pub fn reset(&mut self) {
        let saved = self.saved.clone();
        self.apply(&saved);
        self.goal = saved;
    }

    /// Apply one frame of input to the goal state
    pub fn handle_input(&mut self, input: &CameraInput) {
        if !self.enabled {
            return;
        }

        if input.primary_pressed {
            self.goal.azimuth -= input.mouse_delta.x * self.rotate_speed;
            self.goal.elevation += input.mouse_delta.y * self.rotate_speed;
        }

        if input.secondary_pressed || input.middle_pressed {
            let (right, up) = self.screen_axes();
            let scale = self.pan_speed * self.goal.distance;
            self.goal.target -= right * (input.mouse_delta.x * scale);
            self.goal.target += up * (input.mouse_delta.y * scale);
        }

        if input.scroll_delta != 0.0 {
            self.goal.distance *= (1.0 - self.zoom_speed).powf(input.scroll_delta);
        }

        self.clamp_goal();
    }

    /// Ease toward the goal; returns `(position, look_at)`
    ///
    /// The distance stays within `[min_distance, max_distance]` afterwards.
    pub fn update(&mut self, dt: f32) -> (Vec3, Vec3) {
        self.clamp_goal();
        let t = if self.damping <= 0.0 {
            1.0
        } else {
            (1.0 - self.damping.clamp(0.0, 1.0).powf(dt.max(0.0) * 60.0)).clamp(0.0, 1.0)
        };
        self.azimuth += (self.goal.azimuth - self.azimuth) * t;
        self.elevation += (self.goal.elevation - self.elevation) * t;
        self.distance += (self.goal.distance - self.distance) * t;
        self.target = self.target.lerp(self.goal.target, t);

        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.elevation = self.elevation.clamp(self.min_elevation, self.max_elevation);

        (self.position(), self.target)
    }

    fn clamp_goal(&mut self) {
        self.goal.distance = self.goal.distance.clamp(self.min_distance, self.max_distance);
        self.goal.elevation = self.goal.elevation.clamp(self.min_elevation, self.max_elevation);
    }

    fn current(&self) -> OrbitState {
        OrbitState {
            target: self.target,
            distance: self.distance,
            azimuth: self.azimuth,
            elevation: self.elevation,
        }
    }

    fn apply(&mut self, state: &OrbitState) {
        self.target = state.target;
        self.distance = state.distance;
        self.azimuth = state.azimuth;
        self.elevation = state.elevation;
    }

    /// Camera right and up vectors for panning
    fn screen_axes(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.position()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }
}

fn spherical(position: Vec3, target: Vec3) -> OrbitState {
    let offset = position - target;
    let distance = offset.length();
    let (azimuth, elevation) = if distance > 1e-6 {
        (offset.x.atan2(offset.z), (offset.y / distance).clamp(-1.0, 1.0).asin())
    } else {
        (0.0, 0.0)
    };
    OrbitState {
        target,
        distance,
        azimuth,
        elevation,
    }
}

fn position_of(state: &OrbitState) -> Vec3 {
    let (sin_e, cos_e) = state.elevation.sin_cos();
    let (sin_a, cos_a) = state.azimuth.sin_cos();
    state.target + Vec3::new(cos_e * sin_a, sin_e, cos_e * cos_a) * state.distance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer_orbit() -> OrbitController {
        let mut orbit = OrbitController::from_camera(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
            .with_distance_limits(5.0, 10.0);
        orbit.set_target(Vec3::new(15.0, 0.0, 0.0));
        orbit
    }

    #[test]
    fn test_from_camera_roundtrip() {
        let orbit = OrbitController::from_camera(Vec3::new(3.0, 4.0, -2.0), Vec3::new(1.0, 1.0, 1.0));
        assert!((orbit.position() - Vec3::new(3.0, 4.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_set_target_keeps_camera() {
        let orbit = viewer_orbit();
        assert!((orbit.position() - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
        assert!((orbit.distance - 250f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_update_clamps_distance() {
        let mut orbit = viewer_orbit();
        let (position, look_at) = orbit.update(1.0 / 60.0);
        assert_eq!(look_at, Vec3::new(15.0, 0.0, 0.0));
        assert!(orbit.distance <= 10.0 && orbit.distance >= 5.0);
        assert!((position - look_at).length() <= 10.0 + 1e-4);

        // zooming far in stops at min_distance
        let input = CameraInput {
            scroll_delta: 100.0,
            ..Default::default()
        };
        orbit.handle_input(&input);
        for _ in 0..120 {
            orbit.update(1.0 / 60.0);
            assert!(orbit.distance >= 5.0 - 1e-4 && orbit.distance <= 10.0 + 1e-4);
        }
        assert!((orbit.distance - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_left_drag_rotates() {
        let mut orbit = viewer_orbit();
        orbit.damping = 0.0;
        let before = orbit.azimuth;
        orbit.handle_input(&CameraInput {
            mouse_delta: glam::Vec2::new(100.0, 0.0),
            primary_pressed: true,
            ..Default::default()
        });
        orbit.update(1.0 / 60.0);
        assert!((orbit.azimuth - (before - 0.5)).abs() < 1e-5);
        assert_eq!(orbit.target, Vec3::new(15.0, 0.0, 0.0));
    }

    #[test]
    fn test_elevation_clamped() {
        let mut orbit = viewer_orbit();
        orbit.damping = 0.0;
        orbit.handle_input(&CameraInput {
            mouse_delta: glam::Vec2::new(0.0, 100_000.0),
            primary_pressed: true,
            ..Default::default()
        });
        orbit.update(0.016);
        assert!(orbit.elevation <= FRAC_PI_2 - 0.01 + 1e-6);
    }

    #[test]
    fn test_right_drag_pans_target() {
        let mut orbit = viewer_orbit();
        orbit.damping = 0.0;
        orbit.handle_input(&CameraInput {
            mouse_delta: glam::Vec2::new(50.0, 0.0),
            secondary_pressed: true,
            ..Default::default()
        });
        orbit.update(0.016);
        assert_ne!(orbit.target, Vec3::new(15.0, 0.0, 0.0));
        assert!(orbit.target.y.abs() < 1e-5);
    }

    #[test]
    fn test_reset_and_disabled() {
        let mut orbit = viewer_orbit();
        orbit.update(0.016);
        orbit.save_state();
        let saved = orbit.position();

        orbit.handle_input(&CameraInput {
            mouse_delta: glam::Vec2::new(300.0, 0.0),
            primary_pressed: true,
            ..Default::default()
        });
        orbit.update(1.0);
        assert!((orbit.position() - saved).length() > 0.1);
        orbit.reset();
        assert!((orbit.position() - saved).length() < 1e-4);

        orbit.enabled = false;
        orbit.handle_input(&CameraInput {
            scroll_delta: 5.0,
            ..Default::default()
        });
        orbit.update(1.0);
        assert!((orbit.position() - saved).length() < 1e-4);
    }
}
