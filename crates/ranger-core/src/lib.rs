// # ranger-core
//
// Dual-stack routing layer for IP CIDR range matching.
//
// ## Architecture Overview
//
// This library routes range operations to per-family engines:
// - **VersionedRouter**: Classifies input by address family and delegates
// - **RangeEngine**: Trait for single-family CIDR storage and queries
// - **RangeEntry**: Trait for stored values (a network plus metadata)
// - **EngineRegistry**: Plugin-based registry for engine factories
// - **BruteForceEngine**: Linear-scan reference engine
//
// ## Design Principles
//
// 1. **Classification First**: No engine is touched before input is classified
// 2. **Family Isolation**: An entry lives in exactly one engine for its lifetime
// 3. **Stateless Routing**: The router stores no entries itself
// 4. **Transparent Errors**: Engine results and errors pass through unchanged

pub mod config;
pub mod engine;
pub mod error;
pub mod net;
pub mod registry;
pub mod router;
pub mod traits;

// Re-export core types for convenience
pub use config::{EngineConfig, RouterConfig};
pub use engine::{BruteForceEngine, BruteForceEngineFactory};
pub use error::{Error, Result};
pub use net::{IpFamily, ToAddress, ToNetwork};
pub use registry::EngineRegistry;
pub use router::{PrefixLayout, VersionedRouter};
pub use traits::{BasicRangeEntry, PrefixCounts, RangeEngine, RangeEngineFactory, RangeEntry};
