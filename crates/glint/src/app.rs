//! # Glint Application Loop
//!
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. POLL        window posts platform events to the queue            │
//! │ 2. EVENTS      drain queue                                          │
//! │                ├─ WindowClosed  -> stop                             │
//! │                ├─ WindowResized -> record size, then dispatch       │
//! │                └─ input events  -> InputState, then dispatch        │
//! │ 3. UPDATE      layers bottom-up with the clamped timestep           │
//! │ 4. RENDER      layers bottom-up into the renderer                   │
//! │ 5. PRESENT     window swaps buffers                                 │
//! │ 6. STATS       frame time recorded against the budget               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::error::EngineResult;
use crate::events::{Dispatch, Event, EventQueue, EventSender};
use crate::input::InputState;
use crate::layer::{Layer, LayerStack};
use crate::renderer::Renderer;
use crate::timestep::Timestep;
use crate::window::Window;

/// Frames slower than this many budgets are logged.
const SLOW_FRAME_FACTOR: u32 = 2;

/// Owns the window, renderer and layers, and runs the frame loop.
pub struct Application<W: Window, Rn: Renderer> {
    config: AppConfig,
    window: W,
    renderer: Rn,
    layers: LayerStack,
    events: EventQueue,
    sender: EventSender,
    input: InputState,
    stats: FrameStats,
    size: (u32, u32),
    running: bool,
    frame: u64,
}

impl<W: Window, Rn: Renderer> Application<W, Rn> {
    /// Creates an application around its collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`](crate::EngineError::InvalidConfig)
    /// if `config` does not validate.
    pub fn new(config: AppConfig, window: W, renderer: Rn) -> EngineResult<Self> {
        config.validate()?;
        let events = EventQueue::new(config.event_capacity);
        let sender = events.sender();
        let size = (window.width(), window.height());
        let stats = FrameStats::new(config.frame_budget());

        Ok(Self {
            config,
            window,
            renderer,
            layers: LayerStack::new(),
            events,
            sender,
            input: InputState::new(),
            stats,
            size,
            running: false,
            frame: 0,
        })
    }

    /// Pushes a layer below every overlay.
    pub fn push_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.push_layer(layer);
    }

    /// Pushes an overlay on top of the stack.
    pub fn push_overlay(&mut self, overlay: Box<dyn Layer>) {
        self.layers.push_overlay(overlay);
    }

    /// The layer stack.
    #[must_use]
    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    /// A handle for posting events from outside the window.
    #[must_use]
    pub fn event_sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// The configuration the application was built with.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The window collaborator.
    #[must_use]
    pub const fn window(&self) -> &W {
        &self.window
    }

    /// The renderer collaborator.
    #[must_use]
    pub const fn renderer(&self) -> &Rn {
        &self.renderer
    }

    /// Last known drawable size.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Frames completed so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Runs frames until the window closes.
    ///
    /// May be called again; frame counts and timings keep accumulating.
    /// A window that stays closed ends the next run before its first frame.
    ///
    /// # Errors
    ///
    /// Propagates window failures from polling or presenting.
    #[tracing::instrument(skip_all, fields(title = %self.config.title))]
    pub fn run(&mut self) -> EngineResult<FrameSummary> {
        tracing::info!(
            width = self.size.0,
            height = self.size.1,
            layers = self.layers.len(),
            "application started"
        );
        self.running = true;
        let mut last_frame = Instant::now();

        while self.running {
            let frame_start = Instant::now();
            let ts = Timestep::from(frame_start.duration_since(last_frame));
            last_frame = frame_start;

            self.window.poll_events(&self.sender)?;
            self.input.begin_frame();
            for event in self.events.drain() {
                self.on_event(event);
            }
            if !self.running {
                break;
            }

            self.layers.update(ts, &self.input);
            self.layers.render(&mut self.renderer);
            self.window.swap_buffers()?;

            self.stats.record(self.frame, frame_start.elapsed());
            self.frame += 1;
        }

        let summary = self.stats.summary();
        tracing::info!(
            frames = summary.frames,
            avg_frame_ms = summary.avg_frame_ms,
            over_budget = summary.frames_over_budget,
            "application stopped"
        );
        Ok(summary)
    }

    fn on_event(&mut self, event: Event) {
        match event {
            Event::WindowClosed => {
                tracing::info!(frame = self.frame, "window closed");
                self.running = false;
                return;
            }
            Event::WindowResized { width, height } => {
                tracing::debug!(width, height, "window resized");
                self.size = (width, height);
            }
            _ => self.input.handle_event(&event),
        }

        let mut dispatch = Dispatch::new(event);
        self.layers.dispatch(&mut dispatch);
    }
}

/// Frame time accumulator.
#[derive(Clone, Debug)]
pub struct FrameStats {
    budget: Duration,
    frames: u64,
    total: Duration,
    min: Duration,
    max: Duration,
    over_budget: u64,
}

impl FrameStats {
    /// Creates an empty accumulator measuring against `budget`.
    #[must_use]
    pub const fn new(budget: Duration) -> Self {
        Self {
            budget,
            frames: 0,
            total: Duration::ZERO,
            min: Duration::MAX,
            max: Duration::ZERO,
            over_budget: 0,
        }
    }

    /// Records one frame's time.
    pub fn record(&mut self, frame: u64, elapsed: Duration) {
        self.frames += 1;
        self.total += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);

        if elapsed > self.budget {
            self.over_budget += 1;
        }
        if elapsed > self.budget * SLOW_FRAME_FACTOR {
            tracing::warn!(
                frame,
                elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                budget_ms = self.budget.as_secs_f64() * 1000.0,
                "slow frame"
            );
        }
    }

    /// Frames recorded so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Snapshot of the accumulated timings.
    #[must_use]
    pub fn summary(&self) -> FrameSummary {
        if self.frames == 0 {
            return FrameSummary::default();
        }
        #[allow(clippy::cast_precision_loss)]
        let avg_frame_ms = self.total.as_secs_f64() * 1000.0 / self.frames as f64;
        FrameSummary {
            frames: self.frames,
            avg_frame_ms,
            min_frame_ms: self.min.as_secs_f64() * 1000.0,
            max_frame_ms: self.max.as_secs_f64() * 1000.0,
            avg_fps: if avg_frame_ms > 0.0 { 1000.0 / avg_frame_ms } else { 0.0 },
            frames_over_budget: self.over_budget,
        }
    }
}

/// Timing results of a finished run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameSummary {
    /// Frames completed.
    pub frames: u64,
    /// Mean frame time.
    pub avg_frame_ms: f64,
    /// Fastest frame.
    pub min_frame_ms: f64,
    /// Slowest frame.
    pub max_frame_ms: f64,
    /// Mean frames per second.
    pub avg_fps: f64,
    /// Frames slower than the budget.
    pub frames_over_budget: u64,
}

impl FrameSummary {
    /// Share of frames over budget, `0.0..=1.0`.
    #[must_use]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.frames_over_budget as f64 / self.frames as f64;
        ratio
    }
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "┌─ FRAME STATISTICS ─────────────────────────────────┐")?;
        writeln!(f, "│ Frames:        {}", self.frames)?;
        writeln!(
            f,
            "│ Average:       {:.3} ms ({:.1} FPS)",
            self.avg_frame_ms, self.avg_fps
        )?;
        writeln!(f, "│ Min / Max:     {:.3} ms / {:.3} ms", self.min_frame_ms, self.max_frame_ms)?;
        writeln!(
            f,
            "│ Over budget:   {} ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        )?;
        write!(f, "└────────────────────────────────────────────────────┘")
    }
}
