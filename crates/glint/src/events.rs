//! # Glint Event System
//!
//! Window and input events travel from the window collaborator to the
//! application over a bounded crossbeam channel:
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │   Window    │─────>│ EventQueue  │─────>│ Application │
//! │ poll_events │      │  (bounded)  │      │  dispatch   │
//! └─────────────┘      └─────────────┘      └──────┬──────┘
//!                                                  │
//!                                      overlays ─> layers (top-down)
//! ```
//!
//! A full channel drops new events instead of stalling the producer.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::input::{Key, MouseButton};

/// Events produced by the window collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The user asked to close the window.
    WindowClosed,
    /// The drawable area changed size.
    WindowResized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// A key went down.
    KeyPressed {
        /// The key.
        key: Key,
        /// Generated by key repeat rather than a fresh press.
        repeat: bool,
    },
    /// A key went up.
    KeyReleased {
        /// The key.
        key: Key,
    },
    /// A mouse button went down.
    MouseButtonPressed {
        /// The button.
        button: MouseButton,
    },
    /// A mouse button went up.
    MouseButtonReleased {
        /// The button.
        button: MouseButton,
    },
    /// The cursor moved.
    MouseMoved {
        /// Cursor x in window pixels.
        x: f32,
        /// Cursor y in window pixels.
        y: f32,
    },
    /// The wheel or trackpad scrolled.
    MouseScrolled {
        /// Horizontal offset.
        dx: f32,
        /// Vertical offset.
        dy: f32,
    },
}

/// Broad source of an [`Event`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Window lifecycle and geometry.
    Window,
    /// Key presses and releases.
    Keyboard,
    /// Buttons, motion and scrolling.
    Mouse,
}

impl Event {
    /// Returns the category this event belongs to.
    #[must_use]
    pub const fn category(&self) -> EventCategory {
        match self {
            Self::WindowClosed | Self::WindowResized { .. } => EventCategory::Window,
            Self::KeyPressed { .. } | Self::KeyReleased { .. } => EventCategory::Keyboard,
            Self::MouseButtonPressed { .. }
            | Self::MouseButtonReleased { .. }
            | Self::MouseMoved { .. }
            | Self::MouseScrolled { .. } => EventCategory::Mouse,
        }
    }

    /// Returns `true` for keyboard and mouse events.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        !matches!(self.category(), EventCategory::Window)
    }
}

/// One event on its way down the layer stack.
///
/// Once a layer marks it handled, layers below it never see it.
#[derive(Clone, Copy, Debug)]
pub struct Dispatch {
    event: Event,
    handled: bool,
}

impl Dispatch {
    /// Wraps an unhandled event.
    #[must_use]
    pub const fn new(event: Event) -> Self {
        Self {
            event,
            handled: false,
        }
    }

    /// The event being dispatched.
    #[inline]
    #[must_use]
    pub const fn event(&self) -> &Event {
        &self.event
    }

    /// Returns `true` once a layer consumed the event.
    #[inline]
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        self.handled
    }

    /// Marks the event consumed.
    #[inline]
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    /// Runs `handler` unless the event is already handled; the handler's
    /// return value becomes the new handled flag.
    pub fn handle(&mut self, handler: impl FnOnce(&Event) -> bool) {
        if !self.handled {
            self.handled = handler(&self.event);
        }
    }
}

/// Bounded queue between the window and the application.
///
/// Pre-allocates its channel so event traffic never grows memory.
pub struct EventQueue {
    /// Sender end - cloned into producers.
    sender: Sender<Event>,
    /// Receiver end - drained by the application once per frame.
    receiver: Receiver<Event>,
}

impl EventQueue {
    /// Creates a queue holding at most `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Receives all pending events (non-blocking), oldest first.
    #[inline]
    pub fn drain(&self) -> Vec<Event> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

/// Handle for posting events.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: Sender<Event>,
}

impl EventSender {
    /// Posts an event (non-blocking).
    ///
    /// Returns `false` if the queue is full or gone; the event is dropped.
    #[inline]
    pub fn send(&self, event: Event) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "event queue full, event dropped");
                false
            }
            Err(TrySendError::Disconnected(event)) => {
                tracing::warn!(?event, "event queue closed, event dropped");
                false
            }
        }
    }
}
