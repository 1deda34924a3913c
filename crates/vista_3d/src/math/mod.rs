//! Math types for 3D graphics
//!
//! Vectors, matrices, and quaternions come from `glam`; this module adds the
//! bounding volumes and color type the scene graph uses.

mod bounds;
mod color;

pub use bounds::BoundingBox;
pub use color::Color;

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
