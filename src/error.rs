//! Error types for configuration loading and programmatic selection calls.
//!
//! Interactive input never fails: degenerate regions, unprojectable points
//! and unknown subplots under the pointer are silently excluded.

use std::path::PathBuf;

use thiserror::Error;

use crate::coords::SubplotId;

/// Configuration load / validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File extension is neither json nor yaml/yml
    #[error("unknown config format for {0:?}")]
    UnknownFormat(PathBuf),

    #[error("invalid clickmode flag: {0:?}")]
    InvalidClickMode(String),

    #[error("invalid dragmode: {0:?}")]
    InvalidDragMode(String),

    #[error("invalid selectdirection: {0:?}")]
    InvalidSelectDirection(String),

    /// Interaction constant that is negative or not finite
    #[error("invalid value for {name}: {value}")]
    InvalidConstant { name: &'static str, value: f64 },
}

/// Misuse of the programmatic chart API.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("unknown trace index: {0}")]
    UnknownTrace(usize),

    #[error("unknown subplot: {0}")]
    UnknownSubplot(SubplotId),

    #[error("subplot already exists: {0}")]
    DuplicateSubplot(SubplotId),

    /// The trace type never carries a selection (e.g. carpet)
    #[error("trace {0} does not support selection")]
    NotSelectable(usize),
}
