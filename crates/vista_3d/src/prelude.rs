//! Prelude module for common imports
//!
//! ```rust
//! use vista_3d::prelude::*;
//! ```

// ECS
pub use crate::ecs::{
    Component, Entity, EntityBuilder, Query, Resource, Schedule, System, SystemContext, SystemStage, With,
    Without, World,
};

// Math
pub use crate::math::{BoundingBox, Color, EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

// Scene
pub use crate::scene::{ActiveCamera, GlobalTransform, Mesh, Object3D, PerspectiveCamera, Pivot, Skin, SkinnedMesh};

// Geometry
pub use crate::geometry::{
    BoxGeometry, Geometry, LineSegments, LineVertex, PlaneGeometry, SphereGeometry, TorusGeometry, Vertex,
};

// Assets
pub use crate::assets::{Asset, Assets, GeometryHandle, MaterialHandle, TextureHandle};

// Materials
pub use crate::materials::{
    BasicMaterial, Material, MaterialType, PhongMaterial, ShaderMaterial, ShaderProgram, ShaderUniforms, Side,
    StandardMaterial, Texture, TextureData,
};

// Lights
pub use crate::lights::{
    AmbientLight, CameraHelper, DirectionalLight, LightUniforms, ShadowCamera, ShadowSettings, SpotLight,
    SpotLightHelper,
};

// Animation
pub use crate::animation::{AnimationAction, AnimationClip, AnimationMixer};

// Systems
pub use crate::systems::{animation_schedule, sync_schedule, OrbitAround, Spin, TransformSystem};

// Controls
pub use crate::controls::{CameraInput, OrbitController};

// Loaders
pub use crate::loader::{LoadError, LoadedScene, Progress};

#[cfg(feature = "loader-gltf")]
pub use crate::loader::GltfLoader;

#[cfg(feature = "loader-hdr")]
pub use crate::loader::{HdrImage, HdrLoader, TextureMapping};
