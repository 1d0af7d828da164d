//! Core traits for the range router
//!
//! This module defines the abstract interfaces that engines and entries must follow.
//!
//! - [`RangeEngine`]: Single-family CIDR storage and queries
//! - [`RangeEngineFactory`]: Builds one engine per address family
//! - [`RangeEntry`]: A network plus caller metadata

pub mod range_engine;
pub mod range_entry;

pub use range_engine::{PrefixCounts, RangeEngine, RangeEngineFactory};
pub use range_entry::{BasicRangeEntry, RangeEntry};
