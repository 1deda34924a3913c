//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Failed to initialize platform
    #[error("Platform initialization failed: {0}")]
    InitFailed(String),

    /// Failed to create or run the event loop
    #[error("Event loop error: {0}")]
    EventLoop(String),

    /// Failed to create the window or canvas
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// A host facility (DOM, display) is missing
    #[error("Platform not available: {0}")]
    Unavailable(String),

    /// Platform not supported on this target
    #[error("Platform not supported: {0}")]
    Unsupported(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlatformError::Unavailable("document".into());
        assert_eq!(err.to_string(), "Platform not available: document");

        let err = PlatformError::WindowCreation("no canvas".into());
        assert!(err.to_string().contains("no canvas"));
    }
}
