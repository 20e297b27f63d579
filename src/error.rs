//! Error types for splatshell.
//!
//! Configuration problems are rejected up front; world and environment
//! failures only degrade lighting and never stop traversal.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("failed to load world '{source_id}': {reason}")]
    LoadFailed { source_id: String, reason: String },

    #[error("environment capture failed for '{source_id}': {reason}")]
    CaptureFailed { source_id: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    #[error("failed to open environment image {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("cube face size must be at least 1 pixel")]
    ZeroFaceSize,

    #[error("equirectangular image is empty")]
    EmptyImage,

    #[error("cube faces must be square and share one size")]
    MismatchedFaces,
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    #[error("unknown demo: {0}")]
    UnknownDemo(String),
}
