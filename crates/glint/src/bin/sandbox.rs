//! # Glint Sandbox
//!
//! Headless demo of the engine shell driving the entity store:
//!
//! - Space spawns a burst of entities with transform, sprite, physics and tag
//! - Physics is integrated through a view; entities leaving the arena are
//!   destroyed by id
//! - Holding the left mouse button sprays particles at the cursor
//! - An overlay reads the shared store to draw a fill gauge
//!
//! Usage: `sandbox [config.toml]`. `RUST_LOG` controls log output.

use std::process::ExitCode;
use std::sync::Arc;

use glint::core::{registry, EntityId};
use glint::{
    shared_store, AppConfig, Application, CameraController, Dispatch, EngineResult, Event,
    FrameSummary, HeadlessWindow, Input, Key, Layer, MouseButton, NameGenerator,
    OrthographicCamera, ParticleProps, ParticleSystem, Quad, RecordingRenderer, Renderer,
    SharedStore, Sprite, Tag, Timestep, Transform,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

/// Frames to run when the configuration sets no limit.
const DEFAULT_FRAMES: u64 = 240;

/// Entities spawned per Space press.
const SPAWN_BATCH: usize = 32;

/// Half extents of the playable area in world units.
const ARENA_HALF_WIDTH: f32 = 6.0;
const ARENA_HALF_HEIGHT: f32 = 4.0;

/// Downward acceleration in world units per second squared.
const GRAVITY: f32 = 4.0;

/// Particles emitted per frame while the mouse is held.
const PARTICLES_PER_FRAME: usize = 5;

/// Linear and angular velocity.
#[derive(Clone, Debug, Default, PartialEq)]
struct Physics {
    velocity: [f32; 2],
    angular_velocity: f32,
}

registry! {
    /// Everything a sandbox entity can carry.
    struct Sandbox { Transform, Sprite, Physics, Tag }
}

/// Spawns, moves and draws the entities; owns the camera and particles.
struct SandboxLayer {
    store: SharedStore<Sandbox>,
    names: NameGenerator,
    camera: CameraController,
    particles: ParticleSystem,
    rng: ChaCha8Rng,
    viewport: (u32, u32),
    escaped: Vec<EntityId>,
}

impl SandboxLayer {
    fn new(config: &AppConfig, store: SharedStore<Sandbox>) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let aspect_ratio = config.width as f32 / config.height as f32;
        Self {
            store,
            names: NameGenerator::new(),
            camera: CameraController::new(aspect_ratio, true),
            particles: ParticleSystem::new(config.max_particles, config.seed),
            rng: ChaCha8Rng::seed_from_u64(config.seed ^ 0xA5A5),
            viewport: (config.width, config.height),
            escaped: Vec::new(),
        }
    }

    fn spawn_batch(&mut self) {
        let mut store = self.store.lock();
        let mut spawned = 0;
        for _ in 0..SPAWN_BATCH {
            let Some(entity) = store.create() else {
                tracing::warn!(capacity = store.capacity(), "store full, spawn stopped");
                break;
            };
            let transform = Transform {
                position: [self.rng.gen_range(-1.0..1.0), self.rng.gen_range(-0.5..0.5)],
                rotation: 0.0,
                scale: [0.2, 0.2],
            };
            let sprite = Sprite {
                color: [self.rng.gen(), self.rng.gen(), self.rng.gen(), 1.0],
                depth: 0.0,
            };
            let physics = Physics {
                velocity: [self.rng.gen_range(-3.0..3.0), self.rng.gen_range(1.0..4.0)],
                angular_velocity: self.rng.gen_range(-3.0..3.0),
            };
            entity.set(&mut *store, (transform, sprite, physics, self.names.next_tag()));
            spawned += 1;
        }
        tracing::debug!(spawned, live = store.size(), "entities spawned");
    }

    fn integrate(&mut self, ts: Timestep) {
        let dt = ts.seconds();
        let mut store = self.store.lock();

        self.escaped.clear();
        for (id, (transform, physics)) in store.view::<(Transform, Physics)>().iter_mut() {
            let (Some(transform), Some(physics)) = (transform.as_mut(), physics.as_mut()) else {
                continue;
            };
            physics.velocity[1] -= GRAVITY * dt;
            transform.position[0] += physics.velocity[0] * dt;
            transform.position[1] += physics.velocity[1] * dt;
            transform.rotation += physics.angular_velocity * dt;

            let [x, y] = transform.position;
            if x.abs() > ARENA_HALF_WIDTH || y.abs() > ARENA_HALF_HEIGHT {
                self.escaped.push(id);
            }
        }

        for id in self.escaped.drain(..) {
            if let Some(entity) = store.entity(id) {
                if let Some((Some(tag),)) = entity.components::<(Tag,), _>(&*store) {
                    tracing::debug!(name = tag.as_str(), %id, "entity left the arena");
                }
            }
            store.destroy_id(id);
        }
    }

    fn cursor_to_world(&self, (x, y): (f32, f32)) -> [f32; 2] {
        let (width, height) = self.viewport;
        #[allow(clippy::cast_precision_loss)]
        let (width, height) = (width.max(1) as f32, height.max(1) as f32);
        let zoom = self.camera.zoom_level();
        let [cx, cy, _] = self.camera.camera().position();
        [
            (x / width * 2.0 - 1.0) * self.camera.aspect_ratio() * zoom + cx,
            (1.0 - y / height * 2.0) * zoom + cy,
        ]
    }
}

impl Layer for SandboxLayer {
    fn name(&self) -> &str {
        "sandbox"
    }

    fn on_attach(&mut self) {
        self.spawn_batch();
    }

    fn on_update(&mut self, ts: Timestep, input: &dyn Input) {
        self.camera.on_update(ts, input);
        self.integrate(ts);

        if input.is_mouse_button_pressed(MouseButton::Left) {
            let props = ParticleProps {
                position: self.cursor_to_world(input.mouse_position()),
                ..ParticleProps::default()
            };
            for _ in 0..PARTICLES_PER_FRAME {
                self.particles.emit(&props);
            }
        }
        self.particles.update(ts);
    }

    fn on_render(&mut self, renderer: &mut dyn Renderer) {
        renderer.begin_scene(self.camera.camera());
        {
            let store = self.store.lock();
            for (_, (transform, sprite)) in store.view_ref::<(Transform, Sprite)>().iter() {
                if let (Some(transform), Some(sprite)) = (transform, sprite) {
                    renderer.draw_quad(&transform.quad(sprite));
                }
            }
        }
        self.particles.render(renderer);
        renderer.end_scene();
    }

    fn on_event(&mut self, dispatch: &mut Dispatch) {
        self.camera.on_event(dispatch);
        if let Event::WindowResized { width, height } = *dispatch.event() {
            self.viewport = (width, height);
        }
        dispatch.handle(|event| match event {
            Event::KeyPressed {
                key: Key::Space,
                repeat: false,
            } => {
                self.spawn_batch();
                true
            }
            _ => false,
        });
    }
}

/// Draws a fill gauge for the shared store.
struct StatsOverlay {
    store: SharedStore<Sandbox>,
    camera: OrthographicCamera,
    live: usize,
    peak: usize,
    capacity: usize,
}

impl StatsOverlay {
    fn new(store: SharedStore<Sandbox>) -> Self {
        let capacity = store.lock().capacity();
        Self {
            store,
            camera: OrthographicCamera::new(-1.0, 1.0, -1.0, 1.0),
            live: 0,
            peak: 0,
            capacity,
        }
    }
}

impl Layer for StatsOverlay {
    fn name(&self) -> &str {
        "stats"
    }

    fn on_update(&mut self, _ts: Timestep, _input: &dyn Input) {
        self.live = self.store.lock().size();
        self.peak = self.peak.max(self.live);
    }

    fn on_render(&mut self, renderer: &mut dyn Renderer) {
        #[allow(clippy::cast_precision_loss)]
        let fill = self.live as f32 / self.capacity as f32;
        renderer.begin_scene(&self.camera);
        renderer.draw_quad(
            &Quad::new([-0.6, 0.9], [0.6, 0.05], [0.2, 0.2, 0.2, 0.8]).with_depth(0.9),
        );
        renderer.draw_quad(
            &Quad::new([-0.9 + 0.3 * fill, 0.9], [0.6 * fill, 0.05], [0.3, 0.9, 0.4, 1.0])
                .with_depth(0.95),
        );
        renderer.end_scene();
    }

    fn on_detach(&mut self) {
        tracing::info!(
            live = self.live,
            peak = self.peak,
            capacity = self.capacity,
            "store usage"
        );
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config() -> EngineResult<AppConfig> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    Ok(AppConfig {
        max_frames: config.max_frames.or(Some(DEFAULT_FRAMES)),
        ..config
    })
}

fn script(window: HeadlessWindow) -> HeadlessWindow {
    let press = |key| Event::KeyPressed { key, repeat: false };
    window
        .with_event(2, press(Key::Space))
        .with_event(3, Event::KeyReleased { key: Key::Space })
        .with_event(10, Event::MouseMoved { x: 640.0, y: 200.0 })
        .with_event(10, Event::MouseButtonPressed { button: MouseButton::Left })
        .with_event(25, Event::MouseButtonReleased { button: MouseButton::Left })
        .with_event(30, press(Key::D))
        .with_event(45, Event::KeyReleased { key: Key::D })
        .with_event(50, Event::MouseScrolled { dx: 0.0, dy: -2.0 })
        .with_event(60, press(Key::Space))
        .with_event(61, Event::KeyReleased { key: Key::Space })
        .with_event(90, Event::WindowResized { width: 1920, height: 1080 })
        .with_event(120, press(Key::Space))
        .with_event(121, Event::KeyReleased { key: Key::Space })
}

fn run() -> EngineResult<FrameSummary> {
    let config = load_config()?;
    let store = shared_store::<Sandbox>(config.max_entities);
    let window = script(HeadlessWindow::new(&config));

    let mut app = Application::new(config.clone(), window, RecordingRenderer::new(4))?;
    app.push_layer(Box::new(SandboxLayer::new(&config, Arc::clone(&store))));
    app.push_overlay(Box::new(StatsOverlay::new(store)));

    let summary = app.run()?;
    tracing::info!(
        draw_calls = app.renderer().draw_calls(),
        scenes = app.renderer().scenes_completed(),
        "render totals"
    );
    Ok(summary)
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "sandbox failed");
            ExitCode::FAILURE
        }
    }
}
