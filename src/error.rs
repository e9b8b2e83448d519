//! Error types for loading scenes and position files

use thiserror::Error;

/// Errors that can occur when reading a scene or a position map
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}
