//! Error types for the Galaxy3D spatial partition
//!
//! The per-frame operations of the partition never fail: invalid keys and
//! degenerate geometry degrade to no-ops. Errors only surface when a
//! partition is constructed from an invalid configuration.

use std::fmt;

/// Result type for Galaxy3D partition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D partition errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration rejected by validation (leaf size, epsilon, budget)
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
