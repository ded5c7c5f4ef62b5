//! Error types for light clustering setup.
//!
//! Per-frame misuse (stale ids, buffer overflow, missing `prepare_new_frame`)
//! panics instead; only configuration is reported through [`ClusterError`].

use std::fmt;

/// Main error type of the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterError {
    /// A [`crate::config::LightsConfig`] value is out of range.
    InvalidConfig(String),
}

impl fmt::Display for ClusterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "Invalid lights config: {msg}"),
        }
    }
}

impl std::error::Error for ClusterError {}

/// Convenient Result type alias for fallible setup operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
