//! # Vista 3D
//!
//! Scene model for the Vista viewer.
//!
//! This crate provides:
//! - **ECS** (Entity Component System) holding the scene graph
//! - **Three.js-inspired API** for cameras, lights, meshes and materials
//! - **Animation** clips, a crossfading mixer, and skinning
//! - **Loaders** for glTF 2.0 models and Radiance HDR environments
//!
//! Rendering lives in `vista_gpu`; everything here is CPU-side and runs on
//! both native and `wasm32` targets.
//!
//! ## Quick Start
//!
//! ```rust
//! use vista_3d::prelude::*;
//!
//! let mut world = World::new();
//! let cube = {
//!     let geometries = world.resource_or_default::<Assets<Geometry>>();
//!     geometries.add(BoxGeometry::cube(4.0))
//! };
//! let material = world
//!     .resource_or_default::<Assets<Material>>()
//!     .add(BasicMaterial::with_color(Color::from_hex(0x00ff00)).into());
//!
//! world
//!     .spawn()
//!     .insert(Object3D::at(5.0, 5.0, 5.0))
//!     .insert(Mesh::new(cube, material))
//!     .insert(Spin::new(0.01, 0.01, 0.0));
//!
//! animation_schedule().run(&mut world, 1.0 / 60.0, 0.0, 0);
//! sync_schedule().run(&mut world, 1.0 / 60.0, 0.0, 0);
//! ```

// ECS - Entity Component System
pub mod ecs;

// Math utilities
pub mod math;

// Scene graph
pub mod scene;

// Geometry primitives
pub mod geometry;

// Asset stores
pub mod assets;

// Material system
pub mod materials;

// Lighting
pub mod lights;

// Keyframe animation
pub mod animation;

// Built-in systems
pub mod systems;

// Camera controls
pub mod controls;

// File loaders
pub mod loader;

// Prelude for common imports
pub mod prelude;

// Re-export core types at crate root
pub use assets::{Assets, GeometryHandle, MaterialHandle, TextureHandle};
pub use ecs::{Component, Entity, Query, Schedule, System, SystemContext, SystemStage, World};
pub use geometry::{BoxGeometry, Geometry, PlaneGeometry, SphereGeometry, TorusGeometry, Vertex};
pub use lights::{AmbientLight, DirectionalLight, SpotLight};
pub use materials::{BasicMaterial, Material, PhongMaterial, ShaderMaterial, Side, StandardMaterial};
pub use math::{BoundingBox, Color};
pub use scene::{Mesh, Object3D, PerspectiveCamera};
