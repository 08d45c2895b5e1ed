//! # Layers
//!
//! An application is a stack of layers. Regular layers sit at the bottom in
//! push order; overlays always sit above them.
//!
//! ```text
//!   events ──┐                    ┌── update / render
//!            v                    │
//!   ┌─────────────────────┐       │
//!   │ overlay (last push) │       │
//!   │ overlay             │       │
//!   ├─────────────────────┤ <- insert point
//!   │ layer (last push)   │       │
//!   │ layer               │ <─────┘
//!   └─────────────────────┘
//! ```
//!
//! Update and render run bottom-up. Events run top-down and stop at the
//! first layer that marks them handled.

use crate::events::Dispatch;
use crate::input::Input;
use crate::renderer::Renderer;
use crate::timestep::Timestep;

/// A slice of application behavior with its own state.
///
/// Every hook has an empty default.
pub trait Layer {
    /// Name used for lookup and logs.
    fn name(&self) -> &str;

    /// Called when pushed onto a stack.
    fn on_attach(&mut self) {}

    /// Called when popped, or when the stack is dropped.
    fn on_detach(&mut self) {}

    /// Advances the layer by one frame.
    fn on_update(&mut self, _ts: Timestep, _input: &dyn Input) {}

    /// Submits the layer's draw calls.
    fn on_render(&mut self, _renderer: &mut dyn Renderer) {}

    /// Offers an event to the layer.
    fn on_event(&mut self, _event: &mut Dispatch) {}
}

/// Ordered layers and overlays.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
    /// Index of the first overlay.
    insert: usize,
}

impl LayerStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a layer above the other layers but below every overlay.
    pub fn push_layer(&mut self, mut layer: Box<dyn Layer>) {
        layer.on_attach();
        tracing::info!(layer = layer.name(), "layer attached");
        self.layers.insert(self.insert, layer);
        self.insert += 1;
    }

    /// Pushes an overlay on top of the stack.
    pub fn push_overlay(&mut self, mut overlay: Box<dyn Layer>) {
        overlay.on_attach();
        tracing::info!(overlay = overlay.name(), "overlay attached");
        self.layers.push(overlay);
    }

    /// Removes the topmost layer named `name`, detaching it.
    ///
    /// Overlays are never matched.
    pub fn pop_layer(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let index = self.layers[..self.insert]
            .iter()
            .rposition(|layer| layer.name() == name)?;
        let mut layer = self.layers.remove(index);
        self.insert -= 1;
        layer.on_detach();
        tracing::info!(layer = name, "layer detached");
        Some(layer)
    }

    /// Removes the topmost overlay named `name`, detaching it.
    pub fn pop_overlay(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let offset = self.layers[self.insert..]
            .iter()
            .rposition(|layer| layer.name() == name)?;
        let mut overlay = self.layers.remove(self.insert + offset);
        overlay.on_detach();
        tracing::info!(overlay = name, "overlay detached");
        Some(overlay)
    }

    /// Updates every layer, bottom to top.
    pub fn update(&mut self, ts: Timestep, input: &dyn Input) {
        for layer in &mut self.layers {
            layer.on_update(ts, input);
        }
    }

    /// Renders every layer, bottom to top.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        for layer in &mut self.layers {
            layer.on_render(renderer);
        }
    }

    /// Offers `dispatch` to each layer, top to bottom, until one handles it.
    pub fn dispatch(&mut self, dispatch: &mut Dispatch) {
        for layer in self.layers.iter_mut().rev() {
            if dispatch.is_handled() {
                break;
            }
            layer.on_event(dispatch);
        }
    }

    /// Total number of layers and overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if nothing is pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Names from bottom to top.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|layer| layer.name())
    }
}

impl Drop for LayerStack {
    fn drop(&mut self) {
        for layer in self.layers.iter_mut().rev() {
            layer.on_detach();
        }
    }
}
