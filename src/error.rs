//! Error handling for the openhash library
//!
//! Missing keys, duplicate inserts and removals of absent keys are ordinary
//! negative results and are reported as `bool`/`Option`. The errors here cover
//! the conditions a caller can actually observe and react to: allocation
//! failure while growing and invalid configuration.

use thiserror::Error;

/// Main error type for the openhash library
#[derive(Error, Debug)]
pub enum OpenHashError {
    /// Memory allocation failures
    #[error("Memory allocation failed: requested {size} bytes")]
    OutOfMemory {
        /// Number of bytes requested
        size: usize,
    },

    /// Slot count overflowed `usize` or passed the configured `max_capacity`
    #[error("Capacity overflow while sizing for {requested} slots")]
    CapacityOverflow {
        /// The slot count being rounded up or grown to
        requested: usize,
    },

    /// Configuration or parameter errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl OpenHashError {
    /// Create an out of memory error
    pub fn out_of_memory(size: usize) -> Self {
        Self::OutOfMemory { size }
    }

    /// Create a capacity overflow error
    pub fn capacity_overflow(requested: usize) -> Self {
        Self::CapacityOverflow { requested }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::OutOfMemory { .. } => true,
            Self::CapacityOverflow { .. } => false,
            Self::Configuration { .. } => false,
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::OutOfMemory { .. } => "memory",
            Self::CapacityOverflow { .. } => "capacity",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OpenHashError>;
