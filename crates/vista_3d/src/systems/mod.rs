//! Built-in systems
//!
//! Scene animation (spin, orbit, shader time, clip playback) runs in
//! [`animation_schedule`]; deriving render state from it (world matrices,
//! skinning, helper lines) runs in [`sync_schedule`]. Pausing the scene
//! means skipping the first and still running the second.

mod animation;
mod helper;
mod motion;
mod shader_time;
mod skinning;
mod transform;

pub use animation::AnimationSystem;
pub use helper::HelperSystem;
pub use motion::{OrbitAround, OrbitAroundSystem, Spin, SpinSystem};
pub use shader_time::ShaderTimeSystem;
pub use skinning::SkinningSystem;
pub use transform::TransformSystem;

use crate::ecs::Schedule;

/// Systems that advance scene state each frame
pub fn animation_schedule() -> Schedule {
    Schedule::new()
        .with_system(SpinSystem)
        .with_system(OrbitAroundSystem)
        .with_system(ShaderTimeSystem)
        .with_system(AnimationSystem)
}

/// Systems that derive render state from the scene
pub fn sync_schedule() -> Schedule {
    Schedule::new()
        .with_system(TransformSystem)
        .with_system(SkinningSystem)
        .with_system(HelperSystem)
}
