//! End-to-end runs of the application loop against the headless window
//! and the recording renderer.

use std::sync::Arc;

use glint::core::registry;
use glint::{
    shared_store, AppConfig, Application, Dispatch, EngineError, Event, HeadlessWindow, Input, Key,
    Layer, MouseButton, NameGenerator, RecordingRenderer, Renderer, SharedStore, Sprite, Tag,
    Timestep, Transform,
};
use parking_lot::Mutex;

registry! {
    struct World { Transform, Sprite, Tag }
}

#[derive(Debug, Default)]
struct Counters {
    updates: u64,
    renders: u64,
    events: Vec<Event>,
    space_held_frames: u64,
    detached: bool,
}

type Shared = Arc<Mutex<Counters>>;

/// Records everything it sees and spawns one entity per Space press.
struct WorldLayer {
    counters: Shared,
    store: SharedStore<World>,
    names: NameGenerator,
}

impl Layer for WorldLayer {
    fn name(&self) -> &str {
        "world"
    }

    fn on_detach(&mut self) {
        self.counters.lock().detached = true;
    }

    fn on_update(&mut self, _ts: Timestep, input: &dyn Input) {
        let mut counters = self.counters.lock();
        counters.updates += 1;
        if input.is_key_pressed(Key::Space) {
            counters.space_held_frames += 1;
        }
    }

    fn on_render(&mut self, renderer: &mut dyn Renderer) {
        self.counters.lock().renders += 1;
        renderer.begin_scene(&glint::OrthographicCamera::new(-1.0, 1.0, -1.0, 1.0));
        let store = self.store.lock();
        for (_, (transform, sprite)) in store.view_ref::<(Transform, Sprite)>().iter() {
            if let (Some(transform), Some(sprite)) = (transform, sprite) {
                renderer.draw_quad(&transform.quad(sprite));
            }
        }
        renderer.end_scene();
    }

    fn on_event(&mut self, dispatch: &mut Dispatch) {
        self.counters.lock().events.push(*dispatch.event());
        if let Event::KeyPressed { key: Key::Space, .. } = dispatch.event() {
            let mut store = self.store.lock();
            if let Some(entity) = store.create() {
                entity.set(
                    &mut *store,
                    (Transform::default(), Sprite::default(), self.names.next_tag()),
                );
            }
        }
    }
}

/// Swallows mouse button presses before they reach the world.
struct ClickCatcher {
    caught: Shared,
}

impl Layer for ClickCatcher {
    fn name(&self) -> &str {
        "click-catcher"
    }

    fn on_event(&mut self, dispatch: &mut Dispatch) {
        let caught = &self.caught;
        dispatch.handle(|event| {
            let consume = matches!(event, Event::MouseButtonPressed { .. });
            if consume {
                caught.lock().events.push(*event);
            }
            consume
        });
    }
}

fn config(max_frames: u64) -> AppConfig {
    AppConfig {
        max_frames: Some(max_frames),
        ..AppConfig::default()
    }
}

#[test]
fn test_runs_until_window_closes() {
    let counters = Shared::default();
    let store = shared_store::<World>(16);
    let config = config(10);
    let window = HeadlessWindow::new(&config);

    let mut app = Application::new(config, window, RecordingRenderer::default()).unwrap();
    app.push_layer(Box::new(WorldLayer {
        counters: Arc::clone(&counters),
        store,
        names: NameGenerator::new(),
    }));

    let summary = app.run().unwrap();

    // The close arrives during the tenth poll, before that frame updates.
    assert_eq!(summary.frames, 9);
    assert_eq!(app.frame_count(), 9);
    assert_eq!(app.window().frames_presented(), 9);
    assert_eq!(app.renderer().scenes_completed(), 9);

    let counters = counters.lock();
    assert_eq!(counters.updates, 9);
    assert_eq!(counters.renders, 9);
    assert!(counters.events.is_empty());
}

#[test]
fn test_scripted_input_reaches_layers() {
    let counters = Shared::default();
    let caught = Shared::default();
    let store = shared_store::<World>(16);
    let config = config(8);
    let window = HeadlessWindow::new(&config)
        .with_event(1, Event::KeyPressed { key: Key::Space, repeat: false })
        .with_event(4, Event::KeyReleased { key: Key::Space })
        .with_event(2, Event::MouseButtonPressed { button: MouseButton::Left })
        .with_event(5, Event::KeyPressed { key: Key::Space, repeat: false })
        .with_event(6, Event::KeyReleased { key: Key::Space });

    let mut app = Application::new(config, window, RecordingRenderer::default()).unwrap();
    app.push_layer(Box::new(WorldLayer {
        counters: Arc::clone(&counters),
        store: Arc::clone(&store),
        names: NameGenerator::new(),
    }));
    app.push_overlay(Box::new(ClickCatcher {
        caught: Arc::clone(&caught),
    }));

    app.run().unwrap();

    // Space held during frames 1..=3 and frame 5.
    let counters = counters.lock();
    assert_eq!(counters.space_held_frames, 4);
    assert!(!counters
        .events
        .iter()
        .any(|event| matches!(event, Event::MouseButtonPressed { .. })));
    assert_eq!(caught.lock().events.len(), 1);

    let store = store.lock();
    assert_eq!(store.size(), 2);
    let names: Vec<_> = store
        .view_ref::<(Tag,)>()
        .iter()
        .filter_map(|(_, (tag,))| tag.as_ref().map(|tag| tag.as_str().to_owned()))
        .collect();
    assert_eq!(names, ["Entity 0", "Entity 1"]);

    // The last scene drew both entities.
    assert_eq!(app.renderer().scenes().last().unwrap().quads.len(), 2);
}

#[test]
fn test_resize_updates_size_and_reaches_layers() {
    let counters = Shared::default();
    let config = config(4);
    let window = HeadlessWindow::new(&config).with_event(
        1,
        Event::WindowResized {
            width: 800,
            height: 600,
        },
    );

    let mut app = Application::new(config, window, RecordingRenderer::default()).unwrap();
    assert_eq!(app.size(), (1280, 720));
    app.push_layer(Box::new(WorldLayer {
        counters: Arc::clone(&counters),
        store: shared_store::<World>(4),
        names: NameGenerator::new(),
    }));

    app.run().unwrap();

    assert_eq!(app.size(), (800, 600));
    assert_eq!(
        counters.lock().events,
        vec![Event::WindowResized {
            width: 800,
            height: 600
        }]
    );
}

#[test]
fn test_layers_detach_when_application_drops() {
    let counters = Shared::default();
    let config = config(1);
    let window = HeadlessWindow::new(&config);

    let mut app = Application::new(config, window, RecordingRenderer::default()).unwrap();
    app.push_layer(Box::new(WorldLayer {
        counters: Arc::clone(&counters),
        store: shared_store::<World>(4),
        names: NameGenerator::new(),
    }));
    let summary = app.run().unwrap();
    assert_eq!(summary.frames, 0);
    assert!(!counters.lock().detached);

    drop(app);
    assert!(counters.lock().detached);
}

#[test]
fn test_second_run_stops_on_closed_window() {
    let counters = Shared::default();
    let config = config(3);
    let window = HeadlessWindow::new(&config);

    let mut app = Application::new(config, window, RecordingRenderer::default()).unwrap();
    app.push_layer(Box::new(WorldLayer {
        counters: Arc::clone(&counters),
        store: shared_store::<World>(4),
        names: NameGenerator::new(),
    }));

    assert_eq!(app.run().unwrap().frames, 2);
    assert_eq!(app.run().unwrap().frames, 2);
    assert_eq!(app.frame_count(), 2);
    assert_eq!(counters.lock().updates, 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = AppConfig {
        event_capacity: 0,
        ..AppConfig::default()
    };
    let window = HeadlessWindow::new(&config);

    let result = Application::new(config, window, RecordingRenderer::default());
    assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
}
