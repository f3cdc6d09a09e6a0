//! Parameter types for media operations.
//!
//! These structs describe *what* to do, not *how*. They sit between
//! [`operations`](super::operations), which decides which variants to create,
//! and the [`backend`](super::backend), which does the pixel work, so tests
//! can swap in a mock backend.

use std::path::PathBuf;

/// Parameters for a resize to exact dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}
