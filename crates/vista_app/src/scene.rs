//! The viewer's stock scene

use vista_3d::prelude::*;

use crate::config::ViewerConfig;

/// Entities of the stock scene the engine keeps touching after setup
#[derive(Clone, Copy, Debug)]
pub struct SceneHandles {
    pub camera: Entity,
    pub ambient: Entity,
    pub sun: Entity,
    pub spot: Entity,
    pub cube: Entity,
    pub ground: Entity,
    pub pivot: Entity,
    pub sphere: Entity,
    pub plasma: Entity,
    pub ripple: Entity,
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

fn add_geometry(world: &mut World, geometry: Geometry) -> GeometryHandle {
    world.resource_or_default::<Assets<Geometry>>().add(geometry)
}

fn add_material(world: &mut World, material: impl Into<Material>) -> MaterialHandle {
    world.resource_or_default::<Assets<Material>>().add(material.into())
}

/// Populate `world` with the camera, lights, and meshes
///
/// `aspect` is the surface width over height.
pub fn build_scene(world: &mut World, config: &ViewerConfig, aspect: f32) -> SceneHandles {
    world.insert_resource(ShadowSettings {
        enabled: config.render.shadows,
    });

    let cam = &config.camera;
    let [x, y, z] = cam.position;
    let camera = world
        .spawn()
        .insert(Object3D::at(x, y, z))
        .insert(PerspectiveCamera::from_degrees(cam.fov, aspect, cam.near, cam.far))
        .insert(ActiveCamera)
        .name("camera")
        .id();

    let ambient = world
        .spawn()
        .insert(Object3D::at(0.0, 0.0, 10.0))
        .insert(AmbientLight::from_hex(config.lights.ambient_color))
        .name("ambient")
        .id();

    let lights = &config.lights;
    let mut sun_light = DirectionalLight::new(Color::from_hex(lights.sun_color), lights.sun_intensity).with_shadows();
    sun_light.shadow.enlarge(lights.shadow_enlarge);
    let [x, y, z] = lights.sun_position;
    let mut sun = world
        .spawn()
        .insert(Object3D::at(x, y, z))
        .insert(sun_light)
        .name("sun");
    if lights.animate_sun {
        sun = sun.insert(OrbitAround {
            radius: lights.sun_orbit_radius,
            speed: lights.sun_orbit_speed,
            height: y,
        });
    }
    let sun = sun.id();

    let [x, y, z] = lights.spot_position;
    let spot = world
        .spawn()
        .insert(Object3D::at(x, y, z))
        .insert(
            SpotLight::new(Color::from_hex(lights.spot_color), lights.spot_intensity)
                .angle(lights.spot_angle)
                .with_shadows(),
        )
        .name("spot")
        .id();

    if lights.helpers {
        world
            .spawn()
            .insert(CameraHelper::new(sun))
            .insert(LineSegments::default())
            .name("sun.helper");
        world
            .spawn()
            .insert(SpotLightHelper::new(spot))
            .insert(LineSegments::default())
            .name("spot.helper");
    }

    let scene = &config.scene;
    let geometry = add_geometry(world, BoxGeometry::cube(4.0));
    let material = add_material(world, BasicMaterial::with_color(Color::from_hex(scene.cube_color)));
    let cube = world
        .spawn()
        .insert(Object3D::at(5.0, 5.0, 5.0).with_shadows(true, true))
        .insert(Mesh::new(geometry, material))
        .insert(Spin::new(scene.cube_spin, scene.cube_spin, 0.0))
        .name("cube")
        .id();

    let geometry = add_geometry(world, PlaneGeometry::new(scene.ground_size, scene.ground_size));
    let material = add_material(world, StandardMaterial::new());
    let ground = world
        .spawn()
        .insert(Object3D::at(0.0, -2.0, 0.0).with_shadows(false, true))
        .insert(Mesh::new(geometry, material))
        .name("ground")
        .id();

    // Children orbit the controls target as the pivot turns
    let [x, y, z] = config.controls.target;
    let pivot = world
        .spawn()
        .insert(Object3D::at(x, y, z))
        .insert(Pivot)
        .insert(Spin::y(scene.pivot_spin))
        .name("pivot")
        .id();

    let geometry = add_geometry(world, SphereGeometry::with_radius(1.5));
    let material = add_material(world, StandardMaterial::with_color(Color::from_hex(0x2194ce)).roughness(0.4));
    let sphere = world
        .spawn()
        .insert(Object3D::at(0.0, 0.0, 3.0).with_shadows(true, true))
        .insert(Mesh::new(geometry, material))
        .parent(pivot)
        .name("sphere")
        .id();

    let geometry = add_geometry(world, TorusGeometry::new(1.0, 0.35, 24, 64));
    let material = add_material(
        world,
        ShaderMaterial::new(ShaderProgram::Plasma).with_colors(Color::from_hex(0xff3366), Color::from_hex(0x33ccff)),
    );
    let plasma = world
        .spawn()
        .insert(Object3D::at(3.0, 0.0, -1.5).with_shadows(true, false))
        .insert(Mesh::new(geometry, material))
        .parent(pivot)
        .name("plasma")
        .id();

    let geometry = add_geometry(world, PlaneGeometry::with_segments(3.0, 3.0, 48, 48));
    let material = add_material(
        world,
        ShaderMaterial::new(ShaderProgram::Ripple)
            .with_colors(Color::from_hex(0x1a237e), Color::from_hex(0x80deea))
            .with_wave(0.15, 6.0),
    );
    let ripple = world
        .spawn()
        .insert(Object3D::at(-3.0, -1.0, -1.5))
        .insert(Mesh::new(geometry, material))
        .parent(pivot)
        .name("ripple")
        .id();

    tracing::debug!(entities = world.entity_count(), "scene created");

    SceneHandles {
        camera,
        ambient,
        sun,
        spot,
        cube,
        ground,
        pivot,
        sphere,
        plasma,
        ripple,
    }
}

/// Orbit controls configured from `config`, looking at the controls target
pub fn build_controller(config: &ViewerConfig) -> OrbitController {
    let c = &config.controls;
    let mut controller = OrbitController::from_camera(vec3(config.camera.position), Vec3::ZERO)
        .with_distance_limits(c.min_distance, c.max_distance);
    controller.rotate_speed = c.rotate_speed;
    controller.zoom_speed = c.zoom_speed;
    controller.pan_speed = c.pan_speed;
    controller.damping = c.damping;
    controller.set_target(vec3(c.target));
    controller
}
