//! High-level media operations.
//!
//! Every content folder may carry a `media/` folder. Its files are copied to
//! `<output>/media/` keeping their relative paths, and every raster image
//! also gets a `name-small.ext` copy no wider than the configured width.

use super::backend::{ImageBackend, MediaError};
use super::calculations::fit_to_width;
use super::params::ResizeParams;
use super::rust_backend::is_raster_image;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// How the `-small` variant of an image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmallVariant {
    Resized { width: u32, height: u32 },
    /// Already narrow enough, copied unchanged.
    Copied,
}

/// One file copied out of a `media/` folder.
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedMedia {
    /// Path relative to the `media/` folder.
    pub relative: PathBuf,
    /// `None` for files that are not raster images.
    pub small: Option<SmallVariant>,
}

/// Copy `source` into `output`, creating `-small` variants of raster images.
///
/// Files are visited in path order.
pub fn copy_media(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    small_width: u32,
) -> Result<Vec<CopiedMedia>, MediaError> {
    let mut copied = Vec::new();

    for relative in media_files(source)? {
        let path = source.join(&relative);
        let target = output.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&path, &target)?;

        let small = if is_raster_image(&path) {
            Some(create_small_variant(backend, &path, &target, small_width)?)
        } else {
            None
        };

        copied.push(CopiedMedia { relative, small });
    }

    Ok(copied)
}

/// Fail when two `media/` folders would write the same output file.
///
/// `-small` variants count as written files. A folder may overwrite its
/// own files; only clashes between different folders are reported.
pub fn check_media_collisions<'a>(
    sources: impl IntoIterator<Item = &'a Path>,
) -> Result<(), MediaError> {
    let mut owners: HashMap<PathBuf, &Path> = HashMap::new();

    for source in sources {
        for relative in media_files(source)? {
            let small = is_raster_image(&relative).then(|| small_variant_path(&relative));
            for written in std::iter::once(relative).chain(small) {
                match owners.get(&written) {
                    Some(&first) if first != source => {
                        return Err(MediaError::Collision {
                            relative: written,
                            first: first.to_path_buf(),
                            second: source.to_path_buf(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(written, source);
                    }
                }
            }
        }
    }
    Ok(())
}

/// Files under `source`, relative to it, in path order.
fn media_files(source: &Path) -> Result<Vec<PathBuf>, MediaError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(|source_err| MediaError::Walk {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(source) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

fn create_small_variant(
    backend: &impl ImageBackend,
    source: &Path,
    target: &Path,
    small_width: u32,
) -> Result<SmallVariant, MediaError> {
    let small_path = small_variant_path(target);
    let dims = backend.identify(source)?;

    match fit_to_width((dims.width, dims.height), small_width) {
        Some((width, height)) => {
            backend.resize(&ResizeParams {
                source: source.to_path_buf(),
                output: small_path,
                width,
                height,
            })?;
            Ok(SmallVariant::Resized { width, height })
        }
        None => {
            fs::copy(source, &small_path)?;
            Ok(SmallVariant::Copied)
        }
    }
}

/// `dir/cover.png` → `dir/cover-small.png`.
pub fn small_variant_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}-small.{}", stem, ext.to_string_lossy()),
        None => format!("{}-small", stem),
    };
    path.with_file_name(name)
}

/// Site URL of the small variant of a content image reference.
///
/// `media/cover.png` → `/media/cover-small.png`
pub fn small_variant_url(image: &str) -> String {
    let image = image.trim_start_matches('/');
    let name_start = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[name_start..].rfind('.') {
        Some(dot) => {
            let dot = name_start + dot;
            format!("/{}-small{}", &image[..dot], &image[dot..])
        }
        None => format!("/{}-small", image),
    }
}

/// Site URL of a content image reference: `media/cover.png` → `/media/cover.png`.
pub fn media_url(image: &str) -> String {
    format!("/{}", image.trim_start_matches('/'))
}
