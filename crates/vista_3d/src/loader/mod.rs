//! Asset loaders
//!
//! - glTF 2.0 (`.gltf`, `.glb`) - Feature: `loader-gltf`
//! - Radiance HDR (`.hdr`) - Feature: `loader-hdr`
//!
//! Loaders work on byte slices so the browser build can feed them fetched
//! data; the `load_path` variants read files with progress reporting.

mod progress;
mod scene;

#[cfg(feature = "loader-gltf")]
mod gltf;

#[cfg(feature = "loader-hdr")]
mod hdr;

pub use progress::{read_with_progress, Progress};
pub use scene::{LoadedMaterial, LoadedMesh, LoadedNode, LoadedPrimitive, LoadedScene, LoadedSkin, SceneInstance};

#[cfg(feature = "loader-gltf")]
pub use self::gltf::GltfLoader;

#[cfg(feature = "loader-hdr")]
pub use self::hdr::{HdrImage, HdrLoader, TextureMapping};

use thiserror::Error;

/// Error type for asset loading
#[derive(Debug, Error)]
pub enum LoadError {
    /// File not found
    #[error("file not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(std::io::Error),
    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),
    /// Unsupported format
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// Invalid data
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(err.to_string())
        } else {
            LoadError::Io(err)
        }
    }
}

/// Result type for loaders
pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps() {
        let err: LoadError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, LoadError::NotFound(_)));
        let err: LoadError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, LoadError::Io(_)));
        assert_eq!(LoadError::Parse("bad".into()).to_string(), "parse error: bad");
    }
}
