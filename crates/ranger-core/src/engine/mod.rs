// # Range Engine Implementations
//
// This module provides implementations of the RangeEngine trait. The router
// works with any engine; these ship with the crate so it is usable without
// an external engine.

pub mod brute;

pub use brute::{BruteForceEngine, BruteForceEngineFactory};
