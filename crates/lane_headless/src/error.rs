//! Errors surfaced by the headless runner.

use thiserror::Error;

/// Error type for headless runs.
#[derive(Error, Debug)]
pub enum HeadlessError {
    /// Match configuration could not be loaded.
    #[error("Failed to load match config: {0}")]
    Config(#[from] lane_core::error::GameError),
    /// Report could not be encoded.
    #[error("Failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
    /// Worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// A command-line value is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
