//! # Input State
//!
//! Keyboard and mouse state rebuilt from the event stream. Layers query it
//! through the [`Input`] trait during `on_update`.

use crate::events::Event;

/// Keys the engine tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    /// W
    W,
    /// A
    A,
    /// S
    S,
    /// D
    D,
    /// Q
    Q,
    /// E
    E,
    /// R
    R,
    /// Space bar
    Space,
    /// Escape
    Escape,
    /// Enter / Return
    Enter,
    /// Tab
    Tab,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left shift
    LeftShift,
    /// Left control
    LeftControl,
}

impl Key {
    /// Number of tracked keys.
    pub const COUNT: usize = Self::LeftControl as usize + 1;

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Mouse buttons the engine tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Secondary button
    Right,
    /// Wheel button
    Middle,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = Self::Middle as usize + 1;

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// Read access to the current input state.
pub trait Input {
    /// Returns `true` while `key` is held.
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Returns `true` if `key` went down during the current frame.
    fn was_key_pressed_this_frame(&self, key: Key) -> bool;

    /// Returns `true` while `button` is held.
    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;

    /// Cursor position in window pixels.
    fn mouse_position(&self) -> (f32, f32);
}

/// Input state fed from window events.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    keys: [bool; Key::COUNT],
    pressed_this_frame: [bool; Key::COUNT],
    buttons: [bool; MouseButton::COUNT],
    mouse: (f32, f32),
    scroll: (f32, f32),
}

impl InputState {
    /// Creates a state with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears per-frame edges. Call once before the frame's events.
    pub fn begin_frame(&mut self) {
        self.pressed_this_frame = [false; Key::COUNT];
        self.scroll = (0.0, 0.0);
    }

    /// Applies one event. Non-input events are ignored.
    pub fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::KeyPressed { key, repeat } => {
                self.keys[key.index()] = true;
                if !repeat {
                    self.pressed_this_frame[key.index()] = true;
                }
            }
            Event::KeyReleased { key } => self.keys[key.index()] = false,
            Event::MouseButtonPressed { button } => self.buttons[button.index()] = true,
            Event::MouseButtonReleased { button } => self.buttons[button.index()] = false,
            Event::MouseMoved { x, y } => self.mouse = (x, y),
            Event::MouseScrolled { dx, dy } => {
                self.scroll.0 += dx;
                self.scroll.1 += dy;
            }
            Event::WindowClosed | Event::WindowResized { .. } => {}
        }
    }

    /// Scroll accumulated during the current frame.
    #[must_use]
    pub fn scroll_delta(&self) -> (f32, f32) {
        self.scroll
    }
}

impl Input for InputState {
    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys[key.index()]
    }

    fn was_key_pressed_this_frame(&self, key: Key) -> bool {
        self.pressed_this_frame[key.index()]
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    fn mouse_position(&self) -> (f32, f32) {
        self.mouse
    }
}
