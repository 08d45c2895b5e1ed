//! # Engine Error Types
//!
//! Recoverable failures of the engine shell. Broken store invariants are
//! not errors: they abort inside `glint_core`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or running an application.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file is not valid TOML for [`AppConfig`](crate::AppConfig).
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The window collaborator failed.
    #[error("window error: {0}")]
    Window(String),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
