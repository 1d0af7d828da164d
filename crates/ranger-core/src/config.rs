//! Configuration types for the range router
//!
//! This module defines the configuration structures used to build a
//! [`VersionedRouter`](crate::VersionedRouter) through the engine registry.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "engine": { "type": "brute", "capacity": 1024 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main router configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Engine used for both address families
    #[serde(default)]
    pub engine: EngineConfig,
}

impl RouterConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!(
                "Failed to read router config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.engine.validate()
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineConfig {
    /// Linear-scan reference engine
    Brute {
        /// Entries to preallocate per family
        #[serde(default)]
        capacity: usize,
    },

    /// Engine registered under a custom name
    Custom {
        /// Factory name to use
        factory: String,
    },
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            EngineConfig::Brute { .. } => Ok(()),
            EngineConfig::Custom { factory } => {
                if factory.trim().is_empty() {
                    return Err(crate::Error::config("Custom engine factory cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the engine type name
    pub fn type_name(&self) -> &str {
        match self {
            EngineConfig::Brute { .. } => "brute",
            EngineConfig::Custom { factory } => factory,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::Brute { capacity: 0 }
    }
}
