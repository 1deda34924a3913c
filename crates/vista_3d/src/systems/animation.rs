//! Clip playback

use crate::animation::AnimationMixer;
use crate::ecs::{System, SystemContext, SystemStage};
use crate::scene::Object3D;

/// Advances every [`AnimationMixer`] and writes the blended pose into the
/// target nodes' `Object3D`s
pub struct AnimationSystem;

impl System for AnimationSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        let dt = ctx.delta_time;
        for entity in ctx.world.entities_with::<AnimationMixer>() {
            let pose = match ctx.world.get_mut::<AnimationMixer>(entity) {
                Some(mixer) => {
                    mixer.update(dt);
                    mixer.sample_pose()
                }
                None => continue,
            };
            for (node, values) in pose {
                let Some(object) = ctx.world.get_mut::<Object3D>(node) else {
                    continue;
                };
                if let Some(t) = values.translation {
                    object.position = t;
                }
                if let Some(r) = values.rotation {
                    object.rotation = r;
                }
                if let Some(s) = values.scale {
                    object.scale = s;
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "AnimationSystem"
    }

    fn stage(&self) -> SystemStage {
        SystemStage::PostUpdate
    }
}
