//! # Glint
//!
//! A small 2D engine shell around the `glint_core` entity store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          GLINT APPLICATION                          │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  ┌──────────────┐   events   ┌──────────────┐   quads  ┌─────────┐  │
//! │  │   Window     │──────────> │ Layer stack  │────────> │Renderer │  │
//! │  │ (collab.)    │            │              │          │(collab.)│  │
//! │  └──────────────┘            │ • layers     │          └─────────┘  │
//! │                              │ • overlays   │                       │
//! │                              └──────┬───────┘                       │
//! │                                     │ create / set / view           │
//! │                              ┌──────v───────┐                       │
//! │                              │ glint_core   │                       │
//! │                              │ entity store │                       │
//! │                              └──────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `app`: frame loop and timing
//! - `events` / `input`: window events and the input state built from them
//! - `layer`: the layer stack
//! - `renderer` / `window`: collaborator traits and headless implementations
//! - `camera`, `particle`: 2D camera and CPU particles
//! - `scene`: shared store, stock components, default names
//! - `config` / `error`: TOML configuration and error types

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod layer;
pub mod particle;
pub mod renderer;
pub mod scene;
pub mod timestep;
pub mod window;

pub use glint_core as core;

pub use app::{Application, FrameStats, FrameSummary};
pub use camera::{CameraController, OrthographicCamera};
pub use config::AppConfig;
pub use error::{EngineError, EngineResult};
pub use events::{Dispatch, Event, EventCategory, EventQueue, EventSender};
pub use input::{Input, InputState, Key, MouseButton};
pub use layer::{Layer, LayerStack};
pub use particle::{ParticleProps, ParticleSystem};
pub use renderer::{Quad, RecordingRenderer, Renderer, SceneRecord};
pub use scene::{shared_store, NameGenerator, SharedStore, Sprite, Tag, Transform};
pub use timestep::Timestep;
pub use window::{HeadlessWindow, Window};
