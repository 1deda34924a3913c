//! Error types for vista_app

use thiserror::Error;

/// Errors that can occur in the viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Failed to read or parse the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to initialize or use the GPU
    #[error("GPU error: {0}")]
    Gpu(#[from] vista_gpu::GpuError),

    /// Failed to load an asset
    #[error("Asset loading failed: {0}")]
    Load(#[from] vista_3d::loader::LoadError),

    /// Platform error (windowing, DOM, event loop)
    #[error("Platform error: {0}")]
    Platform(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<vista_platform::PlatformError> for ViewerError {
    fn from(err: vista_platform::PlatformError) -> Self {
        ViewerError::Platform(err.to_string())
    }
}

impl From<anyhow::Error> for ViewerError {
    fn from(err: anyhow::Error) -> Self {
        ViewerError::Other(err.to_string())
    }
}

/// Result type for vista_app operations
pub type Result<T> = std::result::Result<T, ViewerError>;
