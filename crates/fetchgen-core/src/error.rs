//! Error handling for the fetchgen code generation library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Generation-phase failures
//! (reading the description, parsing it, rendering the client, writing the
//! output) are kept apart from configuration and watcher failures so the
//! regeneration loop can decide which ones are fatal.
//!
//! # Examples
//!
//! ```
//! use fetchgen_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::parse("missing 'paths' object"))
//! }
//!
//! assert!(might_fail().unwrap_err().is_generation_failure());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for fetchgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for fetchgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// The description document could not be read
    #[error("failed to read {}: {source}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The description document is not well-formed or lacks a `paths` mapping
    #[error("parse error: {0}")]
    Parse(String),

    /// Rendering the client violated a template contract
    #[error("emit error: {0}")]
    Emit(String),

    /// Template engine error
    #[error("template engine error: {0}")]
    Template(#[from] tera::Error),

    /// The generated client could not be written
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file watcher reported a fault
    #[error("watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new emit error
    pub fn emit<S: Into<String>>(msg: S) -> Self {
        Self::Emit(msg.into())
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Prefix a parse error with the file it came from
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Parse(msg) => Self::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        }
    }

    /// Whether this error belongs to a single generation cycle.
    ///
    /// These are reported as "generation failed" by the regeneration loop and
    /// never end a watch session on their own.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Self::InputRead { .. }
                | Self::Parse(_)
                | Self::Emit(_)
                | Self::Template(_)
                | Self::OutputWrite { .. }
        )
    }
}
