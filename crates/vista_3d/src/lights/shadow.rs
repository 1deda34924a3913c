//! Shadow camera parameters

use glam::{Mat4, Vec3};

/// Projection used when rendering a light's shadow map
///
/// Directional lights use the orthographic box (`left`..`top`); spot
/// lights derive a perspective frustum from their cone and only use
/// `near`, `far`, `map_size` and `bias`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    /// Shadow map resolution (square)
    pub map_size: u32,
    /// Depth bias subtracted before the comparison
    pub bias: f32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            left: -5.0,
            right: 5.0,
            top: 5.0,
            bottom: -5.0,
            near: 0.5,
            far: 500.0,
            map_size: 2048,
            bias: 0.0005,
        }
    }
}

impl ShadowCamera {
    /// Grow the orthographic box by `amount` on every edge
    pub fn enlarge(&mut self, amount: f32) {
        self.left -= amount;
        self.right += amount;
        self.top += amount;
        self.bottom -= amount;
    }

    pub fn with_map_size(mut self, size: u32) -> Self {
        self.map_size = size.max(1);
        self
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }

    /// Light-space view-projection looking from `eye` toward `target`
    pub fn view_projection(&self, eye: Vec3, target: Vec3) -> Mat4 {
        self.projection_matrix() * light_view(eye, target)
    }
}

/// View matrix of a light, choosing an up vector that is never parallel
/// to the light direction
pub(crate) fn light_view(eye: Vec3, target: Vec3) -> Mat4 {
    let dir = (target - eye).normalize_or_zero();
    let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    Mat4::look_at_rh(eye, target, up)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enlarge_symmetric() {
        let mut cam = ShadowCamera::default();
        cam.enlarge(25.0);
        assert_eq!((cam.left, cam.right, cam.top, cam.bottom), (-30.0, 30.0, 30.0, -30.0));
    }

    #[test]
    fn test_view_projection_maps_target_to_center() {
        let mut cam = ShadowCamera::default();
        cam.enlarge(25.0);
        let vp = cam.view_projection(Vec3::splat(20.0), Vec3::ZERO);
        let p = vp.project_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
        assert!(p.z > 0.0 && p.z < 1.0);

        // A point 29 units off-center along the light's right axis stays inside
        let edge = vp.project_point3(Vec3::new(29.0 / 2f32.sqrt(), 0.0, -29.0 / 2f32.sqrt()));
        assert!(edge.x.abs() <= 1.0);
    }

    #[test]
    fn test_light_view_straight_down() {
        let view = light_view(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert!(view.is_finite());
    }
}
