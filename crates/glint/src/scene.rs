//! # Scene Helpers
//!
//! Glue between the entity store and the rest of the engine: a shared
//! store for layers that cooperate on one world, the stock 2D components
//! and a default-name generator.

use std::sync::Arc;

use glint_core::{Registry, Store};
use parking_lot::Mutex;

use crate::renderer::Quad;

/// One entity store shared by several layers.
pub type SharedStore<R> = Arc<Mutex<Store<R>>>;

/// Creates a [`SharedStore`] with room for `max_entities`.
#[must_use]
pub fn shared_store<R: Registry>(max_entities: usize) -> SharedStore<R> {
    Arc::new(Mutex::new(Store::new(max_entities)))
}

/// Position, rotation and scale in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    /// Center of the entity.
    pub position: [f32; 2],
    /// Radians, counter-clockwise.
    pub rotation: f32,
    /// Width and height.
    pub scale: [f32; 2],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 2],
            rotation: 0.0,
            scale: [1.0; 2],
        }
    }
}

impl Transform {
    /// A unit transform at `position`.
    #[must_use]
    pub fn at(position: [f32; 2]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builds the quad drawn for this transform with `sprite`'s color.
    #[must_use]
    pub fn quad(&self, sprite: &Sprite) -> Quad {
        Quad::new(self.position, self.scale, sprite.color)
            .with_rotation(self.rotation)
            .with_depth(sprite.depth)
    }
}

/// Flat-colored quad.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Linear RGBA.
    pub color: [f32; 4],
    /// Draw order; larger is nearer.
    pub depth: f32,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            color: [1.0; 4],
            depth: 0.0,
        }
    }
}

/// Human-readable entity name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

impl Tag {
    /// The name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hands out `"Entity N"` names, counting from zero.
#[derive(Clone, Debug, Default)]
pub struct NameGenerator {
    next: u64,
}

impl NameGenerator {
    /// Creates a generator starting at `"Entity 0"`.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns the next default name.
    pub fn next_name(&mut self) -> String {
        let name = format!("Entity {}", self.next);
        self.next += 1;
        name
    }

    /// Returns the next default name as a [`Tag`].
    pub fn next_tag(&mut self) -> Tag {
        Tag(self.next_name())
    }

    /// Names handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next
    }
}
