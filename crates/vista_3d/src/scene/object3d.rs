//! Base 3D object component

use crate::ecs::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Base component for all 3D objects in the scene graph
///
/// This component stores the local transform (position, rotation, scale)
/// and visibility/rendering properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Object3D {
    /// Local position relative to parent
    pub position: Vec3,
    /// Local rotation as quaternion
    pub rotation: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Visibility flag (hides descendants too)
    pub visible: bool,
    /// Whether this object casts shadows
    pub cast_shadows: bool,
    /// Whether this object receives shadows
    pub receive_shadows: bool,
    /// Render order (higher = rendered later)
    pub render_order: i32,
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            cast_shadows: false,
            receive_shadows: false,
            render_order: 0,
        }
    }
}

impl Component for Object3D {}

impl Object3D {
    /// Create a new Object3D at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with position
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Set rotation from XYZ Euler angles (radians)
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    /// Set scale
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    /// Set uniform scale
    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    /// Enable shadow casting / receiving
    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadows = cast;
        self.receive_shadows = receive;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Compute local transformation matrix (T * R * S)
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Orient -Z toward a target position
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON {
            return;
        }
        let up = if dir.normalize().cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(self.position, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    /// Rotate around local X axis
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::X, angle);
    }

    /// Rotate around local Y axis
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::Y, angle);
    }

    /// Rotate around local Z axis
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate_on_axis(Vec3::Z, angle);
    }

    /// Rotate around an arbitrary local axis
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        let q = Quat::from_axis_angle(axis.normalize(), angle);
        self.rotation = (self.rotation * q).normalize();
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }
}

/// World-space transform, written by `TransformSystem`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalTransform {
    pub matrix: Mat4,
    /// Effective visibility (false if this or any ancestor is hidden)
    pub visible: bool,
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            visible: true,
        }
    }
}

impl Component for GlobalTransform {}

impl GlobalTransform {
    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Normal matrix (inverse transpose of the upper 3x3), padded to 4x4
    pub fn normal_matrix(&self) -> Mat4 {
        let m3 = glam::Mat3::from_mat4(self.matrix);
        if m3.determinant().abs() <= f32::EPSILON {
            return Mat4::IDENTITY;
        }
        Mat4::from_mat3(m3.inverse().transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_accumulates() {
        let mut obj = Object3D::new();
        for _ in 0..100 {
            obj.rotate_y(0.01);
        }
        let (y, _, _) = obj.rotation.to_euler(EulerRot::YXZ);
        assert!((y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_local_matrix() {
        let obj = Object3D::at(1.0, 1.0, 1.0).with_uniform_scale(4.0);
        let p = obj.local_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(5.0, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_look_at() {
        let mut obj = Object3D::at(0.0, 0.0, 5.0);
        obj.look_at(Vec3::ZERO);
        assert!((obj.forward() - Vec3::NEG_Z).length() < 1e-5);

        let mut obj = Object3D::at(-100.0, 100.0, 0.0);
        obj.look_at(Vec3::ZERO);
        let expected = Vec3::new(1.0, -1.0, 0.0).normalize();
        assert!((obj.forward() - expected).length() < 1e-5);
    }

    #[test]
    fn test_look_at_straight_down() {
        let mut obj = Object3D::at(0.0, 10.0, 0.0);
        obj.look_at(Vec3::ZERO);
        assert!((obj.forward() - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_scale() {
        let g = GlobalTransform {
            matrix: Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)),
            visible: true,
        };
        let n = g.normal_matrix().transform_vector3(Vec3::X);
        assert!((n.x - 0.5).abs() < 1e-6);
    }
}
