//! Ordered system execution

use super::{System, SystemContext, World};

/// Systems kept in run order: by stage, then priority, then insertion
#[derive(Default)]
pub struct Schedule {
    systems: Vec<Box<dyn System>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        let key = (system.stage(), system.priority());
        let at = self
            .systems
            .partition_point(|s| (s.stage(), s.priority()) <= key);
        self.systems.insert(at, Box::new(system));
    }

    pub fn with_system<S: System + 'static>(mut self, system: S) -> Self {
        self.add_system(system);
        self
    }

    /// Run every system once
    pub fn run(&mut self, world: &mut World, delta_time: f32, elapsed_time: f32, frame: u64) {
        let mut ctx = SystemContext::new(world, delta_time, elapsed_time, frame);
        for system in &mut self.systems {
            system.run(&mut ctx);
        }
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::SystemStage;

    struct Probe {
        name: &'static str,
        stage: SystemStage,
        priority: i32,
    }

    #[derive(Default)]
    struct RunLog(Vec<&'static str>);

    impl System for Probe {
        fn run(&mut self, ctx: &mut SystemContext) {
            ctx.world.resource_or_default::<RunLog>().0.push(self.name);
        }

        fn name(&self) -> &'static str {
            self.name
        }

        fn stage(&self) -> SystemStage {
            self.stage
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[test]
    fn test_run_order() {
        let mut schedule = Schedule::new();
        for (name, stage, priority) in [
            ("helpers", SystemStage::PreRender, 0),
            ("transform", SystemStage::PostUpdate, 0),
            ("spin", SystemStage::Update, 1),
            ("input", SystemStage::PreUpdate, 0),
            ("orbit", SystemStage::Update, -1),
            ("shader_time", SystemStage::Update, 1),
        ] {
            schedule.add_system(Probe { name, stage, priority });
        }

        let mut world = World::new();
        schedule.run(&mut world, 0.016, 0.0, 0);

        let expected = vec!["input", "orbit", "spin", "shader_time", "transform", "helpers"];
        assert_eq!(world.resource::<RunLog>().unwrap().0, expected);
        assert_eq!(schedule.system_names(), expected);
    }
}
