//! Geometry primitive generators
//!
//! All generators emit counter-clockwise triangles when seen from the
//! side the normals point to.

use super::{Geometry, Vertex};
use glam::Vec3;
use std::f32::consts::PI;

/// Box geometry generator, centered on the origin
pub struct BoxGeometry;

impl BoxGeometry {
    /// Create a box with given dimensions (24 vertices, 36 indices)
    pub fn new(width: f32, height: f32, depth: f32) -> Geometry {
        let half = Vec3::new(width, height, depth) * 0.5;
        // (normal, u axis, v axis) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in faces {
            let center = normal * half;
            let hu = (u * half).length();
            let hv = (v * half).length();
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = center + u * (hu * su) + v * (hv * sv);
                let uv = [(su + 1.0) * 0.5, 1.0 - (sv + 1.0) * 0.5];
                vertices.push(Vertex::new(p.to_array(), normal.to_array(), uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Geometry::from_data(vertices, indices)
    }

    /// Create a cube
    pub fn cube(size: f32) -> Geometry {
        Self::new(size, size, size)
    }
}

/// Sphere geometry generator
pub struct SphereGeometry;

impl SphereGeometry {
    /// Create a sphere with given radius
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let phi = v * PI;

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let theta = u * 2.0 * PI;

                let n = Vec3::new(
                    -phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                );
                vertices.push(Vertex::new((n * radius).to_array(), n.to_array(), [u, v]));
            }
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * (width_segments + 1) + ix;
                let b = a + width_segments + 1;
                let c = b + 1;
                let d = a + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Geometry::from_data(vertices, indices)
    }

    /// Sphere with 32 x 16 segments
    pub fn with_radius(radius: f32) -> Geometry {
        Self::new(radius, 32, 16)
    }
}

/// Plane geometry generator, lying in XZ with a +Y normal
pub struct PlaneGeometry;

impl PlaneGeometry {
    /// Create a plane with given width (X) and depth (Z)
    pub fn new(width: f32, depth: f32) -> Geometry {
        Self::with_segments(width, depth, 1, 1)
    }

    /// Create a plane with segments
    pub fn with_segments(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> Geometry {
        let grid_x = width_segments.max(1);
        let grid_y = depth_segments.max(1);
        let grid_x1 = grid_x + 1;

        let mut vertices = Vec::with_capacity((grid_x1 * (grid_y + 1)) as usize);
        let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);

        for iy in 0..=grid_y {
            let fy = iy as f32 / grid_y as f32;
            // iy walks toward -Z so X x -Z keeps +Y facing triangles CCW
            let z = depth * 0.5 - fy * depth;
            for ix in 0..=grid_x {
                let fx = ix as f32 / grid_x as f32;
                let x = fx * width - width * 0.5;
                vertices.push(Vertex::new([x, 0.0, z], [0.0, 1.0, 0.0], [fx, 1.0 - fy]));
            }
        }

        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = (ix + 1) + grid_x1 * iy;
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = ix + grid_x1 * (iy + 1);

                indices.extend_from_slice(&[a, b, c, a, c, d]);
            }
        }

        Geometry::from_data(vertices, indices)
    }
}

/// Torus geometry generator, lying in the XZ plane
pub struct TorusGeometry;

impl TorusGeometry {
    /// Create a torus
    ///
    /// `radius` is the distance from the center to the tube center.
    pub fn new(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Geometry {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);

        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * 2.0 * PI;
                let v = j as f32 / radial_segments as f32 * 2.0 * PI;

                let ring = Vec3::new(u.cos(), 0.0, u.sin());
                let center = ring * radius;
                let normal = (ring * v.cos() + Vec3::Y * v.sin()).normalize();
                let position = center + normal * tube;

                vertices.push(Vertex::new(
                    position.to_array(),
                    normal.to_array(),
                    [i as f32 / tubular_segments as f32, j as f32 / radial_segments as f32],
                ));
            }
        }

        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = (tubular_segments + 1) * j + i - 1;
                let b = (tubular_segments + 1) * (j - 1) + i - 1;
                let c = (tubular_segments + 1) * (j - 1) + i;
                let d = (tubular_segments + 1) * j + i;

                indices.extend_from_slice(&[a, d, b, b, d, c]);
            }
        }

        Geometry::from_data(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every non-degenerate triangle faces the way its vertex normals point
    fn assert_outward(geom: &Geometry) {
        for tri in geom.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| geom.vertices[i as usize]);
            let face = (b.position() - a.position()).cross(c.position() - a.position());
            if face.length_squared() < 1e-10 {
                continue;
            }
            let normal = a.normal() + b.normal() + c.normal();
            assert!(face.dot(normal) > 0.0, "triangle {:?} winds inward", tri);
        }
    }

    #[test]
    fn test_box_geometry() {
        let geom = BoxGeometry::new(4.0, 4.0, 4.0);
        assert_eq!(geom.vertex_count(), 24);
        assert_eq!(geom.index_count(), 36);
        assert_eq!(geom.bounds.min, Vec3::splat(-2.0));
        assert_eq!(geom.bounds.max, Vec3::splat(2.0));
        assert_outward(&geom);
    }

    #[test]
    fn test_box_non_uniform() {
        let geom = BoxGeometry::new(1.0, 2.0, 3.0);
        assert_eq!(geom.bounds.size(), Vec3::new(1.0, 2.0, 3.0));
        assert_outward(&geom);
    }

    #[test]
    fn test_sphere_geometry() {
        let geom = SphereGeometry::new(1.5, 8, 6);
        assert_eq!(geom.vertex_count(), 9 * 7);
        assert!((geom.bounds.max.y - 1.5).abs() < 1e-5);
        assert_outward(&geom);
    }

    #[test]
    fn test_plane_geometry() {
        let geom = PlaneGeometry::new(60.0, 60.0);
        assert_eq!(geom.vertex_count(), 4);
        assert_eq!(geom.triangle_count(), 2);
        assert_eq!(geom.bounds.size(), Vec3::new(60.0, 0.0, 60.0));
        assert_outward(&geom);
        assert_outward(&PlaneGeometry::with_segments(2.0, 2.0, 8, 8));
    }

    #[test]
    fn test_torus_geometry() {
        let geom = TorusGeometry::new(1.0, 0.4, 12, 24);
        assert_eq!(geom.vertex_count(), 13 * 25);
        assert!((geom.bounds.max.x - 1.4).abs() < 1e-4);
        assert!((geom.bounds.max.y - 0.4).abs() < 1e-4);
        assert_outward(&geom);
    }
}
