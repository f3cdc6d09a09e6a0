//! Image backend trait and shared types.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the
//! recording [`MockBackend`](tests::MockBackend).

use super::params::ResizeParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("media/{relative} is written by both {first} and {second}")]
    Collision {
        relative: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Image operations needed to build small variants.
///
/// `Sync` so one backend can be shared by every rayon worker.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, MediaError>;

    /// Resize to exact dimensions, writing the format implied by the output
    /// extension.
    fn resize(&self, params: &ResizeParams) -> Result<(), MediaError>;
}
