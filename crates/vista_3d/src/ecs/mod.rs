//! Entity component system holding the scene graph
//!
//! Entities are scene nodes; components are their data (transforms,
//! meshes, lights); systems are the per-frame logic; resources hold
//! world-wide state such as the asset stores.

mod component;
mod entity;
mod query;
mod schedule;
mod system;
mod world;

pub use component::{AnyColumn, Column, Columns, Component, StorageType};
pub use entity::{Entity, EntityBuilder, Node, Nodes};
pub use query::{Query, QueryIter, With, Without, WorldQuery};
pub use schedule::Schedule;
pub use system::{System, SystemContext, SystemStage};
pub use world::{Resource, Resources, World};
