//! # Renderer Collaborator
//!
//! The engine describes what to draw as a flat list of quad instances per
//! scene. A GPU backend uploads [`Quad`]s as an instance buffer; the
//! [`RecordingRenderer`] keeps them in memory for headless runs and tests.

use std::collections::VecDeque;

use bytemuck::{Pod, Zeroable};

use crate::camera::{Mat4, OrthographicCamera};

/// One untextured quad instance, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Quad {
    /// Center (xyz); z orders overlapping quads.
    pub position: [f32; 3],
    /// Rotation around Z in radians.
    pub rotation: f32,
    /// Width and height in world units.
    pub size: [f32; 2],
    /// Padding to keep color 16-byte aligned in the instance buffer.
    pub _padding: [f32; 2],
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl Quad {
    /// Size of one instance in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates an unrotated quad at depth zero.
    #[must_use]
    pub const fn new(position: [f32; 2], size: [f32; 2], color: [f32; 4]) -> Self {
        Self {
            position: [position[0], position[1], 0.0],
            rotation: 0.0,
            size,
            _padding: [0.0; 2],
            color,
        }
    }

    /// Returns the quad rotated by `radians`.
    #[must_use]
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    /// Returns the quad moved to depth `z`.
    #[must_use]
    pub fn with_depth(mut self, z: f32) -> Self {
        self.position[2] = z;
        self
    }
}

/// Draw target handed to layers during `on_render`.
///
/// Calls come in `begin_scene`, any number of `draw_quad`, `end_scene`
/// order. Layers may open several scenes per frame.
pub trait Renderer {
    /// Starts a scene seen through `camera`.
    fn begin_scene(&mut self, camera: &OrthographicCamera);

    /// Queues one quad in the open scene.
    fn draw_quad(&mut self, quad: &Quad);

    /// Closes the open scene.
    fn end_scene(&mut self);
}

/// One completed scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneRecord {
    /// Camera matrix the scene was drawn with.
    pub view_projection: Mat4,
    /// Quads in submission order.
    pub quads: Vec<Quad>,
}

/// Headless renderer that records every scene.
///
/// Keeps the last `history` scenes; older ones are discarded.
#[derive(Debug)]
pub struct RecordingRenderer {
    history: usize,
    scenes: VecDeque<SceneRecord>,
    open: Option<SceneRecord>,
    scenes_completed: u64,
    draw_calls: u64,
}

impl RecordingRenderer {
    /// Creates a renderer remembering up to `history` scenes.
    ///
    /// # Panics
    ///
    /// Panics if `history` is zero.
    #[must_use]
    pub fn new(history: usize) -> Self {
        assert!(history > 0, "scene history must hold at least one scene");
        Self {
            history,
            scenes: VecDeque::with_capacity(history),
            open: None,
            scenes_completed: 0,
            draw_calls: 0,
        }
    }

    /// Quads of the most recently completed scene.
    #[must_use]
    pub fn quads(&self) -> &[Quad] {
        match self.scenes.back() {
            Some(scene) => &scene.quads,
            None => &[],
        }
    }

    /// Remembered scenes, oldest first.
    pub fn scenes(&self) -> impl Iterator<Item = &SceneRecord> {
        self.scenes.iter()
    }

    /// Instance buffer bytes of the most recently completed scene.
    #[must_use]
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.quads())
    }

    /// Total `draw_quad` calls accepted.
    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Total scenes completed, including discarded ones.
    #[must_use]
    pub const fn scenes_completed(&self) -> u64 {
        self.scenes_completed
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new(8)
    }
}

impl Renderer for RecordingRenderer {
    fn begin_scene(&mut self, camera: &OrthographicCamera) {
        if self.open.is_some() {
            tracing::warn!("begin_scene while a scene is open, previous scene discarded");
        }
        self.open = Some(SceneRecord {
            view_projection: *camera.view_projection(),
            quads: Vec::new(),
        });
    }

    fn draw_quad(&mut self, quad: &Quad) {
        let Some(scene) = self.open.as_mut() else {
            tracing::warn!("draw_quad outside a scene ignored");
            return;
        };
        scene.quads.push(*quad);
        self.draw_calls += 1;
    }

    fn end_scene(&mut self) {
        let Some(scene) = self.open.take() else {
            tracing::warn!("end_scene without begin_scene ignored");
            return;
        };
        if self.scenes.len() == self.history {
            self.scenes.pop_front();
        }
        self.scenes.push_back(scene);
        self.scenes_completed += 1;
    }
}
