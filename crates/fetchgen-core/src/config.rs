//! Configuration management for fetchgen code generation.
//!
//! This module defines the `Config` struct that describes one generation
//! target: where the description lives, where the client goes and how it is
//! shaped. The configuration can be created programmatically or loaded from a
//! YAML (or TOML) file.
//!
//! # Examples
//!
//! ```no_run
//! use fetchgen_core::config::Config;
//!
//! # async fn example() -> fetchgen_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::new("openapi.json", "src/api-client.js");
//! config.class_name = Some("PetstoreClient".to_string());
//! config.watch = true;
//!
//! // Or load from a config file
//! let config = Config::from_file("fetchgen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::utils::is_valid_identifier;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Class name used when no override is configured
pub const DEFAULT_CLASS_NAME: &str = "ApiClient";

/// Configuration for fetch client generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the API description document (JSON or YAML)
    pub input_path: PathBuf,

    /// Path of the generated client file
    pub output_path: PathBuf,

    /// Name of the generated client class
    #[serde(default)]
    pub class_name: Option<String>,

    /// Optional custom client template
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// Keep regenerating whenever the input changes
    #[serde(default)]
    pub watch: bool,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            class_name: None,
            template_path: None,
            watch: false,
        }
    }

    /// The class name to emit, falling back to [`DEFAULT_CLASS_NAME`]
    pub fn class_name(&self) -> &str {
        self.class_name.as_deref().unwrap_or(DEFAULT_CLASS_NAME)
    }

    /// Check the settings that cannot be caught by deserialization
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(name) = &self.class_name {
            if !is_valid_identifier(name) {
                return Err(crate::Error::config(format!(
                    "class name '{}' is not a valid identifier",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        fs::write(path, content).await?;
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}
