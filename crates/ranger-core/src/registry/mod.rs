//! Plugin-based engine registry
//!
//! The registry allows range engines to be registered by name at runtime,
//! so a router can be built from configuration without hardcoding engine
//! types.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ranger_core::registry::EngineRegistry;
//! use ranger_core::config::{EngineConfig, RouterConfig};
//! use ranger_core::VersionedRouter;
//!
//! let registry = EngineRegistry::new();
//! registry.register_engine("trie", Box::new(TrieEngineFactory));
//!
//! let config = RouterConfig::new().with_engine(EngineConfig::Custom {
//!     factory: "trie".to_string(),
//! });
//! let router = VersionedRouter::from_config(&registry, &config)?;
//! ```
//!
//! The built-in `brute` engine is always available and needs no registration.

use crate::config::EngineConfig;
use crate::engine::BruteForceEngineFactory;
use crate::error::{Error, Result};
use crate::traits::{RangeEngineFactory, RangeEntry};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Registry of named engine factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
pub struct EngineRegistry<E: RangeEntry> {
    /// Registered engine factories
    engines: RwLock<HashMap<String, Arc<dyn RangeEngineFactory<E>>>>,
}

impl<E: RangeEntry> Default for EngineRegistry<E> {
    fn default() -> Self {
        Self {
            engines: RwLock::new(HashMap::new()),
        }
    }
}

impl<E: RangeEntry> EngineRegistry<E> {
    /// Create a new registry holding only the built-in engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an engine factory
    ///
    /// # Parameters
    ///
    /// - `name`: Engine type name (e.g., "trie"); matched against
    ///   `EngineConfig::Custom { factory }`
    /// - `factory`: Factory object for creating engine instances
    ///
    /// Registering an existing name replaces the previous factory.
    pub fn register_engine(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RangeEngineFactory<E>>,
    ) {
        let mut engines = self.engines.write().unwrap_or_else(PoisonError::into_inner);
        engines.insert(name.into(), Arc::from(factory));
    }

    /// Resolve the factory described by `config`
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn RangeEngineFactory<E>>)`: Factory ready to build both engines
    /// - `Err(Error::Config)`: If the engine type is not registered
    pub fn create_factory(&self, config: &EngineConfig) -> Result<Arc<dyn RangeEngineFactory<E>>> {
        match config {
            EngineConfig::Brute { capacity } => {
                Ok(Arc::new(BruteForceEngineFactory::with_capacity(*capacity)))
            }
            EngineConfig::Custom { factory } => {
                let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
                engines
                    .get(factory)
                    .cloned()
                    .ok_or_else(|| Error::config(format!("Unknown engine type: {}", factory)))
            }
        }
    }

    /// List all registered engine type names
    pub fn list_engines(&self) -> Vec<String> {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        engines.keys().cloned().collect()
    }

    /// Check if an engine type is registered
    pub fn has_engine(&self, name: &str) -> bool {
        let engines = self.engines.read().unwrap_or_else(PoisonError::into_inner);
        engines.contains_key(name)
    }
}
