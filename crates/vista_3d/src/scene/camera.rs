//! Camera components

use crate::ecs::Component;
use crate::scene::Object3D;
use glam::{Mat4, Vec3};

/// Perspective camera for 3D rendering
///
/// Uses a frustum-based projection with field of view.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Field of view in radians (vertical)
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Zoom factor (1.0 = normal)
    pub zoom: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(std::f32::consts::FRAC_PI_4, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl Component for PerspectiveCamera {}

impl PerspectiveCamera {
    /// Create a new perspective camera
    ///
    /// # Arguments
    /// * `fov` - Field of view in radians (vertical)
    /// * `aspect` - Aspect ratio (width / height)
    /// * `near` - Near clipping plane
    /// * `far` - Far clipping plane
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
        }
    }

    /// Create with the field of view in degrees
    pub fn from_degrees(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::new(fov_degrees.to_radians(), aspect, near, far)
    }

    /// Set aspect ratio
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Update the aspect ratio from a surface size. Zero sizes are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    /// Get effective field of view (accounting for zoom)
    pub fn effective_fov(&self) -> f32 {
        2.0 * ((self.fov / 2.0).tan() / self.zoom).atan()
    }

    /// Compute projection matrix (wgpu clip space, depth 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.effective_fov(), self.aspect, self.near, self.far)
    }

    /// Compute view matrix from a local transform
    pub fn view_matrix(&self, transform: &Object3D) -> Mat4 {
        let eye = transform.position;
        Mat4::look_at_rh(eye, eye + transform.forward(), transform.up())
    }

    /// Compute view matrix from a world matrix
    pub fn view_from_world(world: &Mat4) -> Mat4 {
        world.inverse()
    }

    /// World-space corners of the frustum (near plane first)
    pub fn frustum_corners(&self, world: &Mat4) -> [Vec3; 8] {
        let inv = (self.projection_matrix() * Self::view_from_world(world)).inverse();
        let mut corners = [Vec3::ZERO; 8];
        let mut i = 0;
        for z in [0.0, 1.0] {
            for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                corners[i] = inv.project_point3(Vec3::new(x, y, z));
                i += 1;
            }
        }
        corners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_aspect() {
        let mut cam = PerspectiveCamera::from_degrees(75.0, 1.0, 0.01, 100.0);
        cam.set_aspect(1920, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        cam.set_aspect(0, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_depth_range() {
        let cam = PerspectiveCamera::from_degrees(75.0, 1.0, 0.01, 100.0);
        let proj = cam.projection_matrix();
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -0.01));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_view_matrix_moves_world() {
        let cam = PerspectiveCamera::default();
        let transform = Object3D::at(0.0, 0.0, 5.0);
        let view = cam.view_matrix(&transform);
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-5);
    }
}
