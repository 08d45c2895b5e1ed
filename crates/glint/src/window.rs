//! # Window Collaborator
//!
//! Platform windowing lives outside the engine. A [`Window`] only has to
//! turn platform input into [`Event`]s and present finished frames.
//! [`HeadlessWindow`] does both without a display, replaying a script.

use std::collections::BTreeMap;

use crate::config::AppConfig;
use crate::error::{EngineError, EngineResult};
use crate::events::{Event, EventSender};

/// A surface the application renders into and receives input from.
pub trait Window {
    /// Posts every event that arrived since the last poll.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Window`] if the platform connection failed.
    fn poll_events(&mut self, events: &EventSender) -> EngineResult<()>;

    /// Presents the finished frame.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Window`] if presentation failed.
    fn swap_buffers(&mut self) -> EngineResult<()>;

    /// Drawable width in pixels.
    fn width(&self) -> u32;

    /// Drawable height in pixels.
    fn height(&self) -> u32;
}

/// Window without a display.
///
/// Replays events scheduled per frame and closes itself after
/// `max_frames` polls, if set. Once closed it posts `WindowClosed` on every
/// later poll, so a second run of the same application stops at once.
#[derive(Debug)]
pub struct HeadlessWindow {
    title: String,
    width: u32,
    height: u32,
    vsync: bool,
    /// Polls completed so far.
    frame: u64,
    max_frames: Option<u64>,
    script: BTreeMap<u64, Vec<Event>>,
    frames_presented: u64,
}

impl HeadlessWindow {
    /// Creates a window sized and titled from `config`.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        tracing::debug!(
            title = %config.title,
            width = config.width,
            height = config.height,
            vsync = config.vsync,
            "headless window created"
        );
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            vsync: config.vsync,
            frame: 0,
            max_frames: config.max_frames,
            script: BTreeMap::new(),
            frames_presented: 0,
        }
    }

    /// Schedules `event` to be posted on poll number `frame` (zero-based).
    #[must_use]
    pub fn with_event(mut self, frame: u64, event: Event) -> Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    /// Window title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether presentation waits for vertical sync.
    #[must_use]
    pub const fn vsync(&self) -> bool {
        self.vsync
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Window for HeadlessWindow {
    fn poll_events(&mut self, events: &EventSender) -> EngineResult<()> {
        let frame = self.frame;
        self.frame += 1;

        for event in self.script.remove(&frame).unwrap_or_default() {
            // Only a delivered resize changes the size.
            if events.send(event) {
                if let Event::WindowResized { width, height } = event {
                    self.width = width;
                    self.height = height;
                }
            }
        }

        let expired = self.max_frames.is_some_and(|max| self.frame >= max);
        if expired && !events.send(Event::WindowClosed) {
            return Err(EngineError::Window(
                "event queue rejected WindowClosed".to_owned(),
            ));
        }
        Ok(())
    }

    fn swap_buffers(&mut self) -> EngineResult<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventQueue;

    fn config(max_frames: Option<u64>) -> AppConfig {
        AppConfig {
            max_frames,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_script_replays_on_schedule() {
        let queue = EventQueue::new(16);
        let mut window = HeadlessWindow::new(&config(None))
            .with_event(1, Event::MouseMoved { x: 1.0, y: 2.0 })
            .with_event(1, Event::WindowResized {
                width: 640,
                height: 480,
            });

        window.poll_events(&queue.sender()).unwrap();
        assert!(queue.drain().is_empty());

        window.poll_events(&queue.sender()).unwrap();
        assert_eq!(queue.drain().len(), 2);
        assert_eq!((window.width(), window.height()), (640, 480));
    }

    #[test]
    fn test_closes_after_max_frames() {
        let queue = EventQueue::new(16);
        let mut window = HeadlessWindow::new(&config(Some(2)));

        window.poll_events(&queue.sender()).unwrap();
        assert!(queue.drain().is_empty());

        window.poll_events(&queue.sender()).unwrap();
        assert_eq!(queue.drain(), vec![Event::WindowClosed]);

        window.poll_events(&queue.sender()).unwrap();
        assert_eq!(queue.drain(), vec![Event::WindowClosed]);
    }

    #[test]
    fn test_dropped_resize_keeps_size() {
        let queue = EventQueue::new(1);
        let mut window = HeadlessWindow::new(&config(None))
            .with_event(0, Event::MouseMoved { x: 3.0, y: 4.0 })
            .with_event(0, Event::WindowResized {
                width: 640,
                height: 480,
            });

        window.poll_events(&queue.sender()).unwrap();
        assert_eq!(queue.drain(), vec![Event::MouseMoved { x: 3.0, y: 4.0 }]);
        assert_eq!((window.width(), window.height()), (1280, 720));
    }

    #[test]
    fn test_rejected_close_is_an_error() {
        let queue = EventQueue::new(1);
        let mut window =
            HeadlessWindow::new(&config(Some(1))).with_event(0, Event::MouseMoved { x: 0.0, y: 0.0 });

        let err = window.poll_events(&queue.sender()).unwrap_err();
        assert!(matches!(err, EngineError::Window(_)));
    }
}
