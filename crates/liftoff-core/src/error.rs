//! Error types for liftoff

use thiserror::Error;

/// The main error type for liftoff operations
#[derive(Debug, Error)]
pub enum LiftoffError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Asset error: {0}")]
    AssetError(String),

    #[error("OBJ load error: {0}")]
    ObjLoadError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Mesh error: {0}")]
    MeshError(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

/// Result type alias for liftoff operations
pub type Result<T> = std::result::Result<T, LiftoffError>;
