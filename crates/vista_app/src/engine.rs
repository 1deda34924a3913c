//! The viewer engine
//!
//! Owns the scene world and drives it: builds the stock scene, loads the
//! model and environment in the background, and runs the per-frame update
//! (input, scene animation, camera, render). The GPU side is optional so the
//! whole update path runs headless in tests.

use vista_3d::animation::AnimationMixer;
use vista_3d::controls::OrbitController;
use vista_3d::ecs::{Entity, Schedule, World};
use vista_3d::loader::{HdrImage, LoadedScene, SceneInstance};
use vista_3d::prelude::{Assets, Geometry, Material, Object3D, PerspectiveCamera, Spin, Texture, Vec3};
use vista_3d::systems::{animation_schedule, sync_schedule, TransformSystem};
use vista_gpu::{GpuContext, GpuError, SceneRenderer};
use vista_platform::{ControlFlow, Cursor, Event, EventLoop, LifecycleEvent, Window, WindowEvent};

use crate::clock::{self, FrameClock};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::input::{InputState, ViewerAction};
use crate::loading::{AssetEvent, AssetLoader};
use crate::scene::{build_controller, build_scene, SceneHandles};

/// Surface plus the renderer drawing into it
struct GpuState {
    ctx: GpuContext,
    renderer: SceneRenderer,
}

/// A loaded model and, once attached, what it added to the world
pub struct LoadedModel {
    pub scene: LoadedScene,
    pub instance: Option<SceneInstance>,
}

impl LoadedModel {
    pub fn root(&self) -> Option<Entity> {
        self.instance.as_ref().map(|i| i.root)
    }
}

/// The scene viewer
pub struct Engine {
    config: ViewerConfig,
    world: World,
    handles: SceneHandles,
    controller: OrbitController,
    input: InputState,
    animation: Schedule,
    sync: Schedule,
    clock: FrameClock,
    /// Seconds of unpaused scene time
    scene_time: f32,
    paused: bool,
    loader: AssetLoader,
    model: Option<LoadedModel>,
    /// Environment waiting for a GPU to upload to
    environment: Option<HdrImage>,
    gpu: Option<GpuState>,
    size: (u32, u32),
    /// Cursor last shown on the window
    cursor: Option<Cursor>,
    running: bool,
}

impl Engine {
    /// Create an engine with the stock scene, sized from the window settings
    pub fn new(config: ViewerConfig) -> Self {
        let size = (config.window.width.max(1), config.window.height.max(1));
        let mut world = World::new();
        let handles = build_scene(&mut world, &config, size.0 as f32 / size.1 as f32);
        let controller = build_controller(&config);

        let mut engine = Self {
            config,
            world,
            handles,
            controller,
            input: InputState::new(),
            animation: animation_schedule(),
            sync: sync_schedule(),
            clock: FrameClock::new(),
            scene_time: 0.0,
            paused: false,
            loader: AssetLoader::new(),
            model: None,
            environment: None,
            gpu: None,
            size,
            cursor: None,
            running: true,
        };
        engine.settle_camera();
        engine
    }

    /// Rebuild the world from `config`, dropping the current scene and model
    pub fn create_scene(&mut self, config: ViewerConfig) {
        let aspect = self.aspect();
        self.world = World::new();
        self.handles = build_scene(&mut self.world, &config, aspect);
        self.controller = build_controller(&config);
        self.config = config;
        self.model = None;
        self.scene_time = 0.0;
        self.settle_camera();

        if let Some(gpu) = &mut self.gpu {
            gpu.renderer.dispose();
            gpu.renderer.set_clear_color(clear_color(&self.config));
        }
        tracing::info!(entities = self.world.entity_count(), "scene created");
    }

    /// Apply the distance limits once and remember the result as the reset
    /// placement
    fn settle_camera(&mut self) {
        self.controller.update(0.0);
        self.controller.save_state();
        self.update_camera(0.0);
        TransformSystem::update(&mut self.world);
    }

    /// Start loading the configured environment and model
    ///
    /// The environment is only fetched when the background or lighting uses
    /// it. Results are picked up by later [`frame`](Self::frame) calls.
    pub fn load_model(&mut self) {
        if self.config.environment.is_used() {
            if let Some(path) = self.config.environment.path.clone() {
                self.loader.load_environment(path);
            }
        }
        match self.config.model.path.clone() {
            Some(path) => self.loader.load_model(path),
            None => tracing::debug!("no model configured"),
        }
    }

    /// Take over a GPU surface and render into it from now on
    pub fn attach_gpu(&mut self, ctx: GpuContext) {
        let mut renderer = SceneRenderer::new(&ctx);
        renderer.set_clear_color(clear_color(&self.config));
        if let Some(image) = self.environment.take() {
            install_environment(&mut renderer, &ctx, &image, &self.config);
        }

        // A fresh renderer has nothing resident yet
        mark_assets_changed(&mut self.world);

        let (width, height) = ctx.size();
        self.gpu = Some(GpuState { ctx, renderer });
        self.resize(width, height);
        tracing::info!(width, height, "renderer attached");
    }

    /// Release the GPU surface; the scene keeps its state
    pub fn detach_gpu(&mut self) {
        if let Some(mut gpu) = self.gpu.take() {
            gpu.renderer.dispose();
            tracing::info!("renderer detached");
        }
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    /// One pass of the render loop at `now_ms`
    ///
    /// Errors are GPU failures; asset failures are logged and absorbed.
    pub fn frame(&mut self, now_ms: f64) -> Result<()> {
        if !self.running {
            return Ok(());
        }
        let time = self.clock.tick(now_ms);

        self.poll_assets();

        self.controller.handle_input(self.input.camera());
        self.input.end_frame();

        if !self.paused {
            self.scene_time += time.delta;
            self.animation.run(&mut self.world, time.delta, self.scene_time, time.frame);
        }
        self.update_camera(time.delta);
        self.sync.run(&mut self.world, time.delta, self.scene_time, time.frame);

        if let Some(gpu) = &mut self.gpu {
            gpu.renderer.render(&mut gpu.ctx, &mut self.world, self.scene_time)?;
        }
        Ok(())
    }

    fn update_camera(&mut self, dt: f32) {
        let (position, target) = self.controller.update(dt);
        if let Some(camera) = self.world.get_mut::<Object3D>(self.handles.camera) {
            camera.position = position;
            camera.look_at(target);
        }
    }

    fn poll_assets(&mut self) {
        for event in self.loader.poll() {
            match event {
                AssetEvent::Progress { asset, percent } => {
                    tracing::info!(%asset, "{percent:.0}% loaded");
                }
                AssetEvent::Model(scene) => self.on_model_loaded(*scene),
                AssetEvent::Environment(image) => self.on_environment_loaded(*image),
                AssetEvent::Failed { asset, error } => {
                    tracing::error!(%asset, %error, "An error happened");
                }
            }
        }
    }

    fn on_model_loaded(&mut self, scene: LoadedScene) {
        tracing::info!(
            name = %scene.name,
            meshes = scene.meshes.len(),
            clips = scene.animations.len(),
            "model loaded"
        );

        let model = &self.config.model;
        let instance = model.attach.then(|| {
            let instance = scene.instantiate(&mut self.world, None);
            let root = instance.root;
            if let Some(object) = self.world.get_mut::<Object3D>(root) {
                object.position = Vec3::from_array(model.position);
                object.scale = Vec3::splat(model.scale);
            }
            self.world.insert(root, Spin::y(model.spin));
            TransformSystem::update(&mut self.world);

            if let Some(mixer) = self.world.get_mut::<AnimationMixer>(root) {
                start_clip(mixer, model.clip.as_deref());
            }
            instance
        });
        if instance.is_none() {
            tracing::debug!("model kept detached from the scene");
        }

        if let Some(previous) = self.model.replace(LoadedModel { scene, instance }) {
            if let Some(instance) = previous.instance {
                instance.despawn(&mut self.world);
            }
        }
    }

    fn on_environment_loaded(&mut self, image: HdrImage) {
        match &mut self.gpu {
            Some(gpu) => install_environment(&mut gpu.renderer, &gpu.ctx, &image, &self.config),
            None => self.environment = Some(image),
        }
    }

    /// Fold in one input event
    pub fn handle_input(&mut self, event: &vista_platform::InputEvent) {
        if let Some(action) = self.input.handle(event) {
            self.apply_action(action);
        }
    }

    pub fn apply_action(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::ResetCamera => {
                self.controller.reset();
                tracing::debug!("camera reset");
            }
            ViewerAction::NextClip => self.next_clip(),
            ViewerAction::TogglePause => {
                self.paused = !self.paused;
                tracing::info!(paused = self.paused, "scene animation toggled");
            }
        }
    }

    fn next_clip(&mut self) {
        let Some(root) = self.model.as_ref().and_then(LoadedModel::root) else {
            return;
        };
        let duration = self.config.model.crossfade;
        let Some(mixer) = self.world.get_mut::<AnimationMixer>(root) else {
            return;
        };
        let Some(next) = mixer.next_clip_name().map(str::to_owned) else {
            return;
        };
        if mixer.crossfade_to(&next, duration) {
            tracing::info!(clip = %next, "crossfading");
        }
    }

    /// New surface size in physical pixels; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        if let Some(camera) = self.world.get_mut::<PerspectiveCamera>(self.handles.camera) {
            camera.set_aspect(width, height);
        }
        if let Some(gpu) = &mut self.gpu {
            gpu.ctx.resize(width, height);
        }
    }

    /// Stop the loop and release the GPU
    ///
    /// Later frames do nothing; the event loop exits on the next event.
    pub fn destroy(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.detach_gpu();
        tracing::info!(frames = self.clock.frame_count(), "engine destroyed");
    }

    /// React to one platform event
    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        if !self.running {
            return ControlFlow::Exit;
        }
        match event {
            Event::Window(WindowEvent::Resized { width, height }) => self.resize(*width, *height),
            Event::Window(WindowEvent::CloseRequested) => return ControlFlow::Exit,
            Event::Window(WindowEvent::Focused(false)) => self.input.release_all(),
            Event::Window(_) => {}
            Event::Input(input) => self.handle_input(input),
            Event::Lifecycle(LifecycleEvent::Suspended) => self.detach_gpu(),
            Event::Lifecycle(LifecycleEvent::Resumed) => {}
            Event::Frame => match self.frame(clock::now_ms()) {
                Ok(()) => {}
                Err(ViewerError::Gpu(GpuError::OutOfMemory)) => {
                    tracing::error!("Out of GPU memory");
                    return ControlFlow::Exit;
                }
                Err(e) => tracing::warn!("frame failed: {e}"),
            },
        }
        ControlFlow::Continue
    }

    /// Run the render loop on `event_loop`
    ///
    /// `create_gpu` is called whenever the host resumes without a surface.
    /// Loading starts with the loop.
    pub fn animate<L, F>(mut self, event_loop: L, mut create_gpu: F) -> Result<()>
    where
        L: EventLoop,
        F: FnMut(&L::Window) -> Result<GpuContext> + 'static,
    {
        self.load_model();
        event_loop.run(move |event, window| {
            if matches!(event, Event::Lifecycle(LifecycleEvent::Resumed)) && self.gpu.is_none() {
                match create_gpu(window) {
                    Ok(ctx) => {
                        self.attach_gpu(ctx);
                        window.request_redraw();
                    }
                    Err(e) => {
                        tracing::error!("Failed to initialize the renderer: {e}");
                        self.destroy();
                        return ControlFlow::Exit;
                    }
                }
            }
            let flow = self.handle_event(&event);
            if flow == ControlFlow::Exit {
                self.destroy();
                return flow;
            }
            let cursor = self.input.cursor();
            if self.cursor != Some(cursor) {
                window.set_cursor(cursor);
                self.cursor = Some(cursor);
            }
            flow
        })?;
        Ok(())
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    pub fn model(&self) -> Option<&LoadedModel> {
        self.model.as_ref()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Loads still in flight
    pub fn pending_loads(&self) -> usize {
        self.loader.in_flight()
    }

    fn aspect(&self) -> f32 {
        self.size.0 as f32 / self.size.1 as f32
    }
}

fn clear_color(config: &ViewerConfig) -> wgpu::Color {
    let [r, g, b, a] = config.render.clear_color;
    wgpu::Color { r, g, b, a }
}

fn install_environment(renderer: &mut SceneRenderer, ctx: &GpuContext, image: &HdrImage, config: &ViewerConfig) {
    renderer.set_environment(
        ctx,
        &image.to_texture(),
        image.average_radiance(),
        config.environment.background,
        config.environment.lighting,
    );
}

fn mark_assets_changed(world: &mut World) {
    if let Some(assets) = world.resource_mut::<Assets<Geometry>>() {
        assets.mark_all_changed();
    }
    if let Some(assets) = world.resource_mut::<Assets<Texture>>() {
        assets.mark_all_changed();
    }
    if let Some(assets) = world.resource_mut::<Assets<Material>>() {
        assets.mark_all_changed();
    }
}

/// Play `clip`, or the first clip when it is unset or unknown
fn start_clip(mixer: &mut AnimationMixer, clip: Option<&str>) {
    if let Some(name) = clip {
        if mixer.play(name) {
            tracing::info!(clip = name, "playing clip");
            return;
        }
        tracing::warn!(clip = name, "clip not found, playing the first one");
    }
    if mixer.play_first() {
        tracing::info!(clip = mixer.current().map(|c| c.name.as_str()), "playing clip");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_3d::animation::{AnimationClip, Channel};
    use vista_3d::prelude::{GlobalTransform, OrbitAround};
    use vista_platform::{InputEvent, Key, KeyState, KeyboardEvent, Modifiers, MouseButton, MouseEvent};

    fn headless() -> Engine {
        let mut config = ViewerConfig::default();
        config.model.path = None;
        Engine::new(config)
    }

    fn press(key: Key) -> Event {
        Event::Input(InputEvent::Keyboard(KeyboardEvent {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
        }))
    }

    fn rotation_y(engine: &Engine, entity: Entity) -> f32 {
        engine.world().get::<Object3D>(entity).unwrap().rotation.to_euler(vista_3d::prelude::EulerRot::YXZ).0
    }

    #[test]
    fn test_camera_starts_within_limits() {
        let engine = headless();
        let camera = engine.world().get::<Object3D>(engine.handles().camera).unwrap();
        let distance = camera.position.distance(Vec3::new(15.0, 0.0, 0.0));
        assert!((distance - 10.0).abs() < 1e-3);
        assert!(engine.world().get::<GlobalTransform>(engine.handles().camera).is_some());
    }

    #[test]
    fn test_frames_spin_cube_and_pivot() {
        let mut engine = headless();
        for i in 0..10 {
            engine.frame(i as f64 * 16.0).unwrap();
        }
        let mut expected = Object3D::new();
        for _ in 0..10 {
            expected.rotate_x(0.01);
            expected.rotate_y(0.01);
        }
        let cube = engine.world().get::<Object3D>(engine.handles().cube).unwrap();
        assert!(cube.rotation.angle_between(expected.rotation) < 1e-4);
        assert!((rotation_y(&engine, engine.handles().pivot) - 0.05).abs() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_scene_but_not_camera() {
        let mut engine = headless();
        engine.frame(0.0).unwrap();
        assert_eq!(engine.handle_event(&press(Key::Space)), ControlFlow::Continue);
        assert!(engine.is_paused());

        let before = rotation_y(&engine, engine.handles().pivot);
        let camera_before = engine.world().get::<Object3D>(engine.handles().camera).unwrap().position;
        engine.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            x: 0.0,
            y: 0.0,
        })));
        engine.handle_event(&Event::Input(InputEvent::Mouse(MouseEvent::Moved { x: 100.0, y: 0.0 })));
        engine.frame(16.0).unwrap();

        assert_eq!(rotation_y(&engine, engine.handles().pivot), before);
        let camera_after = engine.world().get::<Object3D>(engine.handles().camera).unwrap().position;
        assert!(camera_after.distance(camera_before) > 0.1);

        engine.handle_event(&press(Key::Char('r')));
        engine.frame(32.0).unwrap();
        let camera_reset = engine.world().get::<Object3D>(engine.handles().camera).unwrap().position;
        assert!(camera_reset.distance(camera_before) < 1e-3);
    }

    #[test]
    fn test_sun_orbit_follows_scene_time() {
        let mut config = ViewerConfig::default();
        config.model.path = None;
        config.lights.animate_sun = true;
        let mut engine = Engine::new(config);
        assert!(engine.world().has::<OrbitAround>(engine.handles().sun));

        engine.frame(0.0).unwrap();
        engine.frame(50.0).unwrap();
        let sun = engine.world().get::<Object3D>(engine.handles().sun).unwrap().position;
        let t = 50.0 * 0.0005_f32;
        assert!((sun.x - t.sin() * 20.0).abs() < 1e-3);
        assert!((sun.z - t.cos() * 20.0).abs() < 1e-3);
        assert_eq!(sun.y, 20.0);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut engine = headless();
        engine.handle_event(&Event::Window(WindowEvent::Resized {
            width: 800,
            height: 400,
        }));
        let camera = engine.world().get::<PerspectiveCamera>(engine.handles().camera).unwrap();
        assert!((camera.aspect - 2.0).abs() < 1e-6);

        engine.resize(0, 300);
        let camera = engine.world().get::<PerspectiveCamera>(engine.handles().camera).unwrap();
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_model_attach_places_and_plays() {
        let mut engine = headless();
        let mut scene = LoadedScene::new("frame");
        scene.animations = vec![
            AnimationClip::new("Idle", Vec::<Channel>::new()),
            AnimationClip::new("Walk", Vec::<Channel>::new()),
        ];
        engine.config.model.clip = Some("Walk".into());
        engine.on_model_loaded(scene);

        let root = engine.model().and_then(LoadedModel::root).unwrap();
        let object = engine.world().get::<Object3D>(root).unwrap();
        assert_eq!(object.position, Vec3::ONE);
        assert_eq!(object.scale, Vec3::splat(4.0));
        assert_eq!(*engine.world().get::<Spin>(root).unwrap(), Spin::y(0.01));
        assert!(engine.world().get::<GlobalTransform>(root).is_some());

        let mixer = engine.world().get::<AnimationMixer>(root).unwrap();
        assert_eq!(mixer.current().map(|c| c.name.as_str()), Some("Walk"));

        engine.handle_event(&press(Key::Char('n')));
        let mixer = engine.world().get::<AnimationMixer>(root).unwrap();
        assert!(mixer.is_playing());
        assert_eq!(mixer.current().map(|c| c.name.as_str()), Some("Idle"));
    }

    #[test]
    fn test_detached_model_is_stored_only() {
        let mut engine = headless();
        engine.config.model.attach = false;
        let count = engine.world().entity_count();
        engine.on_model_loaded(LoadedScene::new("frame"));
        assert!(engine.model().is_some_and(|m| m.instance.is_none()));
        assert_eq!(engine.world().entity_count(), count);
    }

    #[test]
    fn test_unknown_clip_falls_back_to_first() {
        let mut mixer = AnimationMixer::new(vec![AnimationClip::new("Idle", Vec::<Channel>::new())], Vec::new());
        start_clip(&mut mixer, Some("Run"));
        assert_eq!(mixer.current().map(|c| c.name.as_str()), Some("Idle"));
    }

    #[test]
    fn test_environment_waits_for_gpu() {
        let mut engine = headless();
        engine.on_environment_loaded(HdrImage {
            width: 1,
            height: 1,
            data: vec![[1.0, 1.0, 1.0, 1.0]],
            mapping: Default::default(),
        });
        assert!(engine.environment.is_some());
    }

    #[test]
    fn test_failed_load_keeps_running() {
        let mut config = ViewerConfig::default();
        config.model.path = Some("/nonexistent/vista/frame.glb".into());
        let mut engine = Engine::new(config);
        engine.load_model();
        assert_eq!(engine.pending_loads(), 1);

        let mut now = 0.0;
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while engine.pending_loads() > 0 && std::time::Instant::now() < deadline {
            engine.frame(now).unwrap();
            now += 16.0;
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(engine.pending_loads(), 0);
        assert!(engine.model().is_none());
        assert!(engine.is_running());
    }

    #[test]
    fn test_close_and_destroy() {
        let mut engine = headless();
        assert_eq!(
            engine.handle_event(&Event::Window(WindowEvent::CloseRequested)),
            ControlFlow::Exit
        );
        engine.destroy();
        assert!(!engine.is_running());
        assert_eq!(engine.handle_event(&Event::Frame), ControlFlow::Exit);
        engine.destroy();
    }

    #[test]
    fn test_create_scene_rebuilds_world() {
        let mut engine = headless();
        engine.on_model_loaded(LoadedScene::new("frame"));
        let mut config = engine.config().clone();
        config.lights.helpers = false;
        engine.create_scene(config);
        assert!(engine.model().is_none());
        assert!(!engine.config().lights.helpers);
        assert!(engine.world().find_by_name("sun.helper").is_none());
    }

    #[test]
    fn test_replacing_model_releases_previous() {
        let mut engine = headless();
        let entities = engine.world().entity_count();
        let geometries = engine.world().resource::<Assets<Geometry>>().map_or(0, Assets::len);
        let materials = engine.world().resource::<Assets<Material>>().map_or(0, Assets::len);

        let mut scene = LoadedScene::new("frame");
        scene.meshes.push(vista_3d::loader::LoadedMesh {
            name: "box".into(),
            primitives: vec![vista_3d::loader::LoadedPrimitive {
                geometry: vista_3d::prelude::BoxGeometry::cube(1.0),
                material: None,
            }],
        });
        scene.nodes.push(vista_3d::loader::LoadedNode {
            name: "body".into(),
            translation: Vec3::ZERO,
            rotation: vista_3d::prelude::Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: Some(0),
            skin: None,
            children: vec![],
        });
        scene.root_nodes.push(0);

        for _ in 0..3 {
            engine.on_model_loaded(scene.clone());
        }
        let geometry_count = engine.world().resource::<Assets<Geometry>>().map_or(0, Assets::len);
        let material_count = engine.world().resource::<Assets<Material>>().map_or(0, Assets::len);
        assert_eq!(geometry_count, geometries + 1);
        assert_eq!(material_count, materials + 1);
        // model root, one node, one mesh
        assert_eq!(engine.world().entity_count(), entities + 3);
    }
}
