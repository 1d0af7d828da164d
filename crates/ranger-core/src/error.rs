//! Error types for the range router
//!
//! This module defines all error types used throughout the crate.

use crate::net::IpFamily;
use thiserror::Error;

/// Result type alias for router and engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the range router
#[derive(Error, Debug)]
pub enum Error {
    /// Address or network base could not be classified as IPv4 or IPv6
    #[error("Invalid address input: {0}")]
    InvalidAddressInput(String),

    /// Network rejected by an engine (wrong family, malformed prefix)
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    /// No entry stored at the requested network
    #[error("Network not found: {0}")]
    NotFound(String),

    /// Engine-specific failure
    #[error("Engine error ({family}): {message}")]
    Engine {
        /// Family of the engine that failed
        family: IpFamily,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid address input error
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddressInput(msg.into())
    }

    /// Create an invalid network error
    pub fn invalid_network(msg: impl Into<String>) -> Self {
        Self::InvalidNetwork(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an engine-specific error
    pub fn engine(family: IpFamily, message: impl Into<String>) -> Self {
        Self::Engine {
            family,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from address-family classification
    pub fn is_invalid_address(&self) -> bool {
        matches!(self, Self::InvalidAddressInput(_))
    }

    /// Whether this error is an engine's not-found signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
