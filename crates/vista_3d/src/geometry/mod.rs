//! Geometry primitives

mod primitives;
mod vertex;

pub use primitives::{BoxGeometry, PlaneGeometry, SphereGeometry, TorusGeometry};
pub use vertex::{Geometry, LineSegments, LineVertex, SkinWeights, Vertex};
