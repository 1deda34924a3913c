//! Advances procedural shader time

use crate::assets::Assets;
use crate::ecs::{System, SystemContext};
use crate::materials::Material;

/// Writes elapsed seconds into the `time` uniform of every shader material
pub struct ShaderTimeSystem;

impl System for ShaderTimeSystem {
    fn run(&mut self, ctx: &mut SystemContext) {
        let time = ctx.elapsed_time;
        let Some(materials) = ctx.world.resource_mut::<Assets<Material>>() else {
            return;
        };
        let shaders: Vec<_> = materials
            .iter()
            .filter(|(_, m)| matches!(m, Material::Shader(_)))
            .map(|(h, _)| h)
            .collect();
        for handle in shaders {
            if let Some(Material::Shader(shader)) = materials.get_mut(handle) {
                shader.uniforms.time = time;
            }
        }
    }

    fn name(&self) -> &'static str {
        "ShaderTimeSystem"
    }

    fn priority(&self) -> i32 {
        20
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Schedule, World};
    use crate::materials::{BasicMaterial, ShaderMaterial, ShaderProgram};

    #[test]
    fn test_time_advances_only_shader_materials() {
        let mut world = World::new();
        let mut materials = Assets::<Material>::new();
        let plasma = materials.add(ShaderMaterial::new(ShaderProgram::Plasma).into());
        let basic = materials.add(BasicMaterial::new().into());
        materials.take_changed();
        world.insert_resource(materials);

        let mut schedule = Schedule::new().with_system(ShaderTimeSystem);
        schedule.run(&mut world, 0.016, 2.5, 10);

        let materials = world.resource_mut::<Assets<Material>>();
        let Some(materials) = materials else {
            panic!("materials resource missing");
        };
        match materials.get(plasma) {
            Some(Material::Shader(s)) => assert_eq!(s.uniforms.time, 2.5),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(materials.take_changed(), vec![plasma]);
        assert!(materials.get(basic).is_some());
    }
}
