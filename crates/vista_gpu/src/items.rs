//! Draw list gathering

use glam::Vec3;
use vista_3d::assets::{Assets, GeometryHandle, MaterialHandle};
use vista_3d::ecs::{Entity, World};
use vista_3d::materials::{Material, ShaderProgram, Side};
use vista_3d::scene::{GlobalTransform, Mesh, Object3D};

use crate::uniforms::ModelUniform;

/// Pipeline family a draw goes through
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Lit,
    Procedural(ShaderProgram),
}

impl DrawKind {
    /// Sort rank grouping draws that share a pipeline
    fn rank(&self) -> u8 {
        match self {
            DrawKind::Lit => 0,
            DrawKind::Procedural(ShaderProgram::Plasma) => 1,
            DrawKind::Procedural(ShaderProgram::Ripple) => 2,
        }
    }

    pub fn program(&self) -> Option<ShaderProgram> {
        match self {
            DrawKind::Lit => None,
            DrawKind::Procedural(program) => Some(*program),
        }
    }
}

/// One visible mesh ready to draw
#[derive(Clone, Copy, Debug)]
pub struct RenderItem {
    pub entity: Entity,
    pub geometry: GeometryHandle,
    pub material: MaterialHandle,
    pub kind: DrawKind,
    pub side: Side,
    pub transparent: bool,
    pub cast_shadows: bool,
    pub model: ModelUniform,
    /// Squared distance from the eye
    pub depth: f32,
    pub render_order: i32,
}

/// Visible meshes of `world`: opaque first grouped by pipeline and
/// material, then transparent back to front
///
/// Entities without a `GlobalTransform` (never seen by the transform system)
/// or whose material is missing are skipped.
pub fn collect_render_items(world: &World, eye: Vec3) -> Vec<RenderItem> {
    let Some(materials) = world.resource::<Assets<Material>>() else {
        return Vec::new();
    };

    let mut items: Vec<RenderItem> = world
        .query::<(&Mesh, &GlobalTransform)>()
        .iter()
        .filter(|(_, (_, global))| global.visible)
        .filter_map(|(entity, (mesh, global))| {
            let material = materials.get(mesh.material)?;
            let object = world.get::<Object3D>(entity);
            let kind = match material {
                Material::Shader(m) => DrawKind::Procedural(m.program),
                _ => DrawKind::Lit,
            };
            Some(RenderItem {
                entity,
                geometry: mesh.geometry,
                material: mesh.material,
                kind,
                side: material.side(),
                transparent: material.is_transparent(),
                cast_shadows: object.is_some_and(|o| o.cast_shadows),
                model: ModelUniform::new(global, object.is_some_and(|o| o.receive_shadows)),
                depth: global.translation().distance_squared(eye),
                render_order: object.map_or(0, |o| o.render_order),
            })
        })
        .collect();

    items.sort_by(|a, b| {
        a.render_order
            .cmp(&b.render_order)
            .then(a.transparent.cmp(&b.transparent))
            .then_with(|| {
                if a.transparent {
                    b.depth.total_cmp(&a.depth)
                } else {
                    a.kind
                        .rank()
                        .cmp(&b.kind.rank())
                        .then(a.material.cmp(&b.material))
                        .then(a.depth.total_cmp(&b.depth))
                }
            })
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_3d::geometry::{BoxGeometry, Geometry};
    use vista_3d::materials::{BasicMaterial, ShaderMaterial, StandardMaterial};
    use vista_3d::systems::TransformSystem;

    fn spawn_mesh(world: &mut World, material: Material, z: f32) -> Entity {
        let geometry = world.resource_or_default::<Assets<Geometry>>().add(BoxGeometry::cube(1.0));
        let material = world.resource_or_default::<Assets<Material>>().add(material);
        world
            .spawn()
            .insert(Object3D::at(0.0, 0.0, z).with_shadows(true, false))
            .insert(Mesh::new(geometry, material))
            .id()
    }

    #[test]
    fn test_order_and_visibility() {
        let mut world = World::new();
        let near_glass = spawn_mesh(&mut world, StandardMaterial::default().with_opacity(0.5).into(), 4.0);
        let far_glass = spawn_mesh(&mut world, StandardMaterial::default().with_opacity(0.5).into(), -4.0);
        let plasma = spawn_mesh(&mut world, ShaderMaterial::new(ShaderProgram::Plasma).into(), 0.0);
        let cube = spawn_mesh(&mut world, BasicMaterial::with_color(vista_3d::math::Color::GREEN).into(), 1.0);
        let hidden = spawn_mesh(&mut world, BasicMaterial::new().into(), 2.0);
        if let Some(o) = world.get_mut::<Object3D>(hidden) {
            o.visible = false;
        }
        // never transformed: skipped
        let geometry = world.resource_or_default::<Assets<Geometry>>().add(Geometry::new());
        let material = world.resource_or_default::<Assets<Material>>().add(BasicMaterial::new().into());
        TransformSystem::update(&mut world);
        world.spawn().insert(Mesh::new(geometry, material));

        let items = collect_render_items(&world, Vec3::new(0.0, 0.0, 10.0));
        let order: Vec<Entity> = items.iter().map(|i| i.entity).collect();
        assert_eq!(order, vec![cube, plasma, far_glass, near_glass]);

        assert_eq!(items[1].kind, DrawKind::Procedural(ShaderProgram::Plasma));
        assert!(items[0].cast_shadows);
        assert_eq!(items[0].model.flags[0], 0.0);
    }

    #[test]
    fn test_no_materials() {
        let world = World::new();
        assert!(collect_render_items(&world, Vec3::ZERO).is_empty());
    }
}
