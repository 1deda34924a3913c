//! Vertex format and geometry structures

use crate::ecs::Component;
use crate::math::{BoundingBox, Color};
use glam::Vec3;

/// Vertex data for 3D geometry
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in local space
    pub position: [f32; 3],
    /// Normal vector
    pub normal: [f32; 3],
    /// Texture coordinates
    pub uv: [f32; 2],
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            normal: [0.0, 1.0, 0.0],
            uv: [0.0, 0.0],
        }
    }
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Per-vertex joint influences of a skinned mesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinWeights {
    pub joints: Vec<[u16; 4]>,
    pub weights: Vec<[f32; 4]>,
}

/// Geometry resource containing vertex and index data
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Index data (triangles, counter-clockwise front faces)
    pub indices: Vec<u32>,
    /// Axis-aligned bounding box
    pub bounds: BoundingBox,
    /// Joint influences, present on skinned bind-pose geometry
    pub skin: Option<SkinWeights>,
}

impl Geometry {
    /// Create empty geometry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from vertices and indices
    pub fn from_data(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut geometry = Self {
            vertices,
            indices,
            bounds: BoundingBox::empty(),
            skin: None,
        };
        geometry.compute_bounds();
        geometry
    }

    pub fn with_skin(mut self, skin: SkinWeights) -> Self {
        self.skin = Some(skin);
        self
    }

    /// Compute bounding volumes from vertex data
    pub fn compute_bounds(&mut self) {
        self.bounds = BoundingBox::from_points(self.vertices.iter().map(Vertex::position));
    }

    /// Smooth normals: area-weighted average of adjacent face normals
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= normals.len() || b >= normals.len() || c >= normals.len() {
                continue;
            }
            let p0 = self.vertices[a].position();
            let face = (self.vertices[b].position() - p0).cross(self.vertices[c].position() - p0);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(normals) {
            if n.length_squared() > 1e-12 {
                vertex.normal = n.normalize().to_array();
            }
        }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get index count
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Vertex of a line list
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Line list drawn unlit, in world space
#[derive(Clone, Debug, Default)]
pub struct LineSegments {
    pub vertices: Vec<LineVertex>,
}

impl Component for LineSegments {}

impl LineSegments {
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// Append one segment
    pub fn push(&mut self, a: Vec3, b: Vec3, color: Color) {
        let color = color.to_array();
        self.vertices.push(LineVertex {
            position: a.to_array(),
            color,
        });
        self.vertices.push(LineVertex {
            position: b.to_array(),
            color,
        });
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
    }

    #[test]
    fn test_recompute_normals() {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
            Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0; 2]),
        ];
        let mut geom = Geometry::from_data(vertices, vec![0, 1, 2]);
        geom.recompute_normals();
        for v in &geom.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
        assert_eq!(geom.bounds.max, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_line_segments() {
        let mut lines = LineSegments::default();
        lines.push(Vec3::ZERO, Vec3::X, Color::WHITE);
        assert_eq!(lines.segment_count(), 1);
        lines.clear();
        assert_eq!(lines.segment_count(), 0);
    }
}
