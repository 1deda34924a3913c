//! Renderer errors

use thiserror::Error;

/// Error type for GPU setup and frame submission
#[derive(Debug, Error)]
pub enum GpuError {
    /// No adapter compatible with the surface
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no usable texture format
    #[error("surface supports no texture format")]
    UnsupportedSurface,

    #[error("GPU out of memory")]
    OutOfMemory,
}

/// Result type for GPU operations
pub type Result<T> = std::result::Result<T, GpuError>;
