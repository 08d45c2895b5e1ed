//! # Application Configuration
//!
//! Loaded once at startup from TOML. Every key is optional:
//!
//! ```toml
//! title = "Glint Sandbox"
//! width = 1280
//! height = 720
//! max_entities = 4096
//! max_frames = 600
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Configuration for an [`Application`](crate::Application).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in pixels.
    pub width: u32,
    /// Initial window height in pixels.
    pub height: u32,
    /// Wait for vertical sync on buffer swap.
    pub vsync: bool,
    /// Entity store capacity.
    pub max_entities: usize,
    /// Particle pool size.
    pub max_particles: usize,
    /// Events buffered between polls before new ones are dropped.
    pub event_capacity: usize,
    /// Frame rate the frame budget is derived from.
    pub target_fps: u32,
    /// Stop after this many frames (headless runs).
    pub max_frames: Option<u64>,
    /// Seed for every random stream in the engine.
    pub seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Glint Sandbox".to_owned(),
            width: 1280,
            height: 720,
            vsync: true,
            max_entities: 1024,
            max_particles: 10_000,
            event_capacity: 256,
            target_fps: 60,
            max_frames: None,
            seed: 0x5EED,
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParse`] for malformed TOML and
    /// [`EngineError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read, otherwise the
    /// errors of [`AppConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Checks every value that must be non-zero or bounded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> EngineResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_entities == 0 {
            return Err(invalid("max_entities must be greater than zero".to_owned()));
        }
        if u32::try_from(self.max_entities).is_err() {
            return Err(invalid(format!(
                "max_entities {} exceeds {}",
                self.max_entities,
                u32::MAX
            )));
        }
        if self.max_particles == 0 {
            return Err(invalid("max_particles must be greater than zero".to_owned()));
        }
        if self.event_capacity == 0 {
            return Err(invalid("event_capacity must be greater than zero".to_owned()));
        }
        if self.target_fps == 0 {
            return Err(invalid("target_fps must be greater than zero".to_owned()));
        }
        Ok(())
    }

    /// Time available to one frame at `target_fps`.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidConfig(message)
}
