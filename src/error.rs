// src/error.rs
//! Unified error handling for vitals-core
//!
//! Synthesis, ticking and rendering are infallible by construction. The only
//! fallible edges are configuration, serialization, recorded-case loading and
//! the async runtime the store needs for its tickers; those all funnel into
//! [`VitalsError`].

use crate::config::ConfigError;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, VitalsError>;

/// Unified error type for the crate
#[derive(Debug, Error)]
pub enum VitalsError {
    /// Configuration could not be loaded or failed validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A ticker was requested outside of a Tokio runtime
    #[error("runtime error: {reason}")]
    Runtime {
        /// What the store was trying to do
        reason: String,
    },

    /// A recorded case that cannot be played back
    #[error("invalid recorded case: {reason}")]
    InvalidCase {
        /// Why the case was rejected
        reason: String,
    },

    /// A device id that cannot be registered
    #[error("invalid device id '{id}': {reason}")]
    InvalidDevice {
        /// Offending id
        id: String,
        /// Why it was rejected
        reason: String,
    },
}

impl VitalsError {
    /// Build a runtime error
    pub fn runtime(reason: impl Into<String>) -> Self {
        VitalsError::Runtime { reason: reason.into() }
    }

    /// Build an invalid-device error
    pub fn invalid_device(id: impl Into<String>, reason: impl Into<String>) -> Self {
        VitalsError::InvalidDevice {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Build an invalid-case error
    pub fn invalid_case(reason: impl Into<String>) -> Self {
        VitalsError::InvalidCase { reason: reason.into() }
    }

    /// Whether the error stems from user-supplied configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, VitalsError::Config(_))
    }
}
