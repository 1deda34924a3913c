//! Per-frame systems

use super::World;

/// When in a frame a system runs
///
/// Stages run in declaration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemStage {
    PreUpdate,
    /// Spins, orbits, shader time
    #[default]
    Update,
    /// Animation, skinning, transform propagation
    PostUpdate,
    /// Anything that reads final world matrices, e.g. light helpers
    PreRender,
}

/// What a system sees for one frame
pub struct SystemContext<'a> {
    pub world: &'a mut World,
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Seconds of scene time
    pub elapsed_time: f32,
    pub frame: u64,
}

impl<'a> SystemContext<'a> {
    pub fn new(world: &'a mut World, delta_time: f32, elapsed_time: f32, frame: u64) -> Self {
        Self {
            world,
            delta_time,
            elapsed_time,
            frame,
        }
    }
}

/// Per-frame logic over the world
///
/// ```rust,ignore
/// struct Bob;
///
/// impl System for Bob {
///     fn run(&mut self, ctx: &mut SystemContext) {
///         let y = ctx.elapsed_time.sin();
///         // ...
///     }
///
///     fn name(&self) -> &'static str {
///         "Bob"
///     }
/// }
/// ```
pub trait System: Send + Sync {
    fn run(&mut self, ctx: &mut SystemContext);

    fn name(&self) -> &'static str;

    fn stage(&self) -> SystemStage {
        SystemStage::Update
    }

    /// Order within the stage, lowest first
    fn priority(&self) -> i32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(SystemStage::PreUpdate < SystemStage::Update);
        assert!(SystemStage::Update < SystemStage::PostUpdate);
        assert!(SystemStage::PostUpdate < SystemStage::PreRender);
        assert_eq!(SystemStage::default(), SystemStage::Update);
    }
}
