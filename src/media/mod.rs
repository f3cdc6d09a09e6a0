//! Media copying with small variants, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resize** | `DynamicImage::resize` with Lanczos3 |
//! | **Walk** | `walkdir` over each `media/` folder |
//!
//! The module is split into:
//! - **Calculations**: Pure width-fitting math (unit testable)
//! - **Parameters**: Data structures describing a resize
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Copy a `media/` folder and create `-small` variants

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{Dimensions, ImageBackend, MediaError};
pub use calculations::fit_to_width;
pub use operations::{
    CopiedMedia, SmallVariant, check_media_collisions, copy_media, media_url, small_variant_url,
};
pub use params::ResizeParams;
pub use rust_backend::RustBackend;
